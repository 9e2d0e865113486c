pub mod add_comment;
pub mod create_ticket;
pub mod get_ticket;
pub mod transition_ticket;
pub mod update_checklist;

#[cfg(test)]
pub(crate) mod test_support;
