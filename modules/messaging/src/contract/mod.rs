pub mod model;

pub use model::{
    Conversation, ConversationSummary, LastMessage, Message, MessageWithSender, NewMessage,
};
