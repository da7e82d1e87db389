use super::MessageId;

/// One element of a [`THREAD`](https://tools.ietf.org/html/rfc5256#section-4) response.
///
/// The response `(2)(3 6 (4 23)(44 7 96))` is a list of two branches: `[2]` and
/// `[3, 6, [4, 23], [44, 7, 96]]`. Inside a branch each message is a reply to the message before
/// it, and a nested branch hangs off the last message preceding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThreadNode {
    /// A single message.
    Message(MessageId),
    /// A parenthesized group.
    Branch(Vec<ThreadNode>),
}

impl ThreadNode {
    /// A branch made of consecutive messages.
    pub fn branch(ids: impl IntoIterator<Item = MessageId>) -> Self {
        ThreadNode::Branch(ids.into_iter().map(ThreadNode::Message).collect())
    }
}

impl From<MessageId> for ThreadNode {
    fn from(id: MessageId) -> Self {
        ThreadNode::Message(id)
    }
}
