//! Outbound registration email.
//!
//! Fire-and-forget: the mail is handed to the external mail collaborator on
//! a detached task. Delivery has no retry and no effect on the request's
//! success response; failures are logged and swallowed.

use engine::users;

pub fn spawn_confirmation(user: &users::Model) {
    let email = user.email.clone();
    let name = user.name.clone();

    tokio::spawn(async move {
        // Mail transport is an external collaborator; this process only
        // records the handoff.
        tracing::info!("sending confirmation email to {email} ({name})");
    });
}
