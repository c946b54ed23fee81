//! Conversation assembly for backend requests

use super::messages::ModelMessage;
use crate::config::timeouts::limits::MAX_PAGE_CONTENT_CHARS;
use crate::types::ChatRequest;

const CHAT_PROMPT: &str = "You are a helpful assistant running inside the user's browser. \
Answer questions about the current page when page content is provided, and be concise.";

const AGENT_PROMPT: &str = "You can use tools to work with the user's open workspace and browser. \
Call a tool when it helps answer the request, then continue once you have the result. \
Files you create are returned to the user for review rather than written directly. \
Browser actions are emitted as commands that the extension executes.";

/// Truncate to `max_chars` characters, reporting whether anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

/// Build the message list sent to a backend
///
/// A system entry carrying the instructions and page content comes first,
/// followed by the conversation in its original order.
pub fn build_messages(request: &ChatRequest, agent: bool) -> Vec<ModelMessage> {
    let mut system = String::from(CHAT_PROMPT);
    if agent {
        system.push_str("\n\n");
        system.push_str(AGENT_PROMPT);
    }

    let page = request.page_content.trim();
    if !page.is_empty() {
        let (page, truncated) = truncate_chars(page, MAX_PAGE_CONTENT_CHARS);
        system.push_str("\n\nCurrent page content:\n");
        system.push_str(page);
        if truncated {
            system.push_str("\n[Page content truncated]");
        }
    }

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(ModelMessage::system(system));
    messages.extend(request.messages.iter().map(ModelMessage::from));
    messages
}
