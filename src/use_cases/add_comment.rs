use uuid::Uuid;

use crate::domain::entities::{extract_mentions, TicketComment};
use crate::domain::errors::TicketError;
use crate::domain::ports::{Clock, TicketStore};
use crate::interface_adapters::protocol::CommentCreateRequest;

// Comment creation use case with injected dependencies. Mentions are parsed
// out of the body at append time and frozen on the comment record.
pub struct AddCommentUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> AddCommentUseCase<C, S>
where
    C: Clock,
    S: TicketStore,
{
    pub async fn execute(
        &self,
        ticket_id: u64,
        payload: CommentCreateRequest,
    ) -> Result<TicketComment, TicketError> {
        let author = payload.author.trim();
        if author.is_empty() {
            return Err(TicketError::EmptyActor);
        }
        if payload.body.trim().is_empty() {
            return Err(TicketError::EmptyCommentBody);
        }

        let mut ticket = self
            .store
            .get(ticket_id)
            .await
            .map_err(|_| TicketError::StorageFailure)?
            .ok_or(TicketError::TicketNotFound)?;

        let comment = TicketComment {
            id: Uuid::new_v4().to_string(),
            author: author.to_string(),
            body: payload.body.clone(),
            posted_at: self.clock.now(),
            mentions: extract_mentions(&payload.body),
        };
        ticket.comments.push(comment.clone());

        let updated = self
            .store
            .update(ticket)
            .await
            .map_err(|_| TicketError::StorageFailure)?;
        if !updated {
            // Ticket vanished between get and update.
            return Err(TicketError::TicketNotFound);
        }

        Ok(comment)
    }
}
