//! Yes/no confirmation requests.
//!
//! An action that needs the user's approval awaits [`Confirm::confirm`]. The
//! channel implementation hands each question to the presentation layer as a
//! [`ConfirmRequest`] and suspends until that request is answered.

use tokio::sync::{mpsc, oneshot};

/// Something that can ask the user a yes/no question.
#[allow(async_fn_in_trait)]
pub trait Confirm {
    /// Ask `message`, resolving to `true` only on an explicit yes.
    async fn confirm(&self, message: &str) -> bool;
}

/// A question waiting for the user's answer.
#[derive(Debug)]
pub struct ConfirmRequest {
    pub message: String,
    reply: oneshot::Sender<bool>,
}

impl ConfirmRequest {
    /// Answer the question. Dropping the request unanswered counts as "no".
    pub fn respond(self, confirmed: bool) {
        if self.reply.send(confirmed).is_err() {
            log::debug!("Confirmation answered after the asker went away");
        }
    }
}

/// Sending half of a confirmation channel. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct ConfirmChannel {
    tx: mpsc::Sender<ConfirmRequest>,
}

/// Create a confirmation channel holding up to `buffer` unanswered requests.
pub fn confirm_channel(buffer: usize) -> (ConfirmChannel, mpsc::Receiver<ConfirmRequest>) {
    let (tx, rx) = mpsc::channel(buffer);
    (ConfirmChannel { tx }, rx)
}

impl Confirm for ConfirmChannel {
    async fn confirm(&self, message: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let request = ConfirmRequest {
            message: message.to_string(),
            reply,
        };
        if self.tx.send(request).await.is_err() {
            log::warn!("No one is listening for confirmations; treating as declined");
            return false;
        }
        answer.await.unwrap_or(false)
    }
}
