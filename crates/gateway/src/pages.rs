//! Server-rendered HTML pages.
//!
//! Every dynamic value is escaped here except assistant turns, which come
//! out of the render pipeline already safe to embed.

use std::fmt::Write;

use memochat_agent::{ConversationState, Speaker};
use memochat_config::ConnectionConfig;
use memochat_render::{escape_html, render_assistant, render_user};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
{body}
<script src="/static/app.js"></script>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(
            r#"<div class="error-banner" role="alert">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    }
}

/// The connect form. The API key field is never pre-filled.
pub fn connect_page(defaults: &ConnectionConfig, error: Option<&str>) -> String {
    let body = format!(
        r#"<main class="connect">
<h1>memochat</h1>
<p class="subtitle">A chat assistant with long-term memory.</p>
{banner}
<form method="post" action="/" class="connect-form">
<label for="api_key">API key</label>
<input id="api_key" name="api_key" type="password" autocomplete="off" required>
<label for="base_url">Base URL</label>
<input id="base_url" name="base_url" type="url" value="{base_url}" required>
<label for="model_name">Model</label>
<input id="model_name" name="model_name" type="text" value="{model}" required>
<button type="submit">Start chatting</button>
</form>
</main>"#,
        banner = error_banner(error),
        base_url = escape_html(&defaults.base_url),
        model = escape_html(&defaults.model),
    );
    layout("memochat", &body)
}

/// The transcript, the memory timeline and the message form.
///
/// `pending` refills the message box after a failed submission.
pub fn chat_page(state: &ConversationState, error: Option<&str>, pending: Option<&str>) -> String {
    let mut transcript = String::new();
    for turn in state.turns() {
        let (class, sender, html) = match turn.speaker() {
            Speaker::User => ("user", "User", render_user(turn.text())),
            Speaker::Assistant => ("assistant", "Assistant", render_assistant(turn.text())),
        };
        let _ = write!(
            transcript,
            r#"<div class="chat-element {class}"><div class="sender">{sender}:</div><div class="content">{html}</div></div>"#,
        );
        transcript.push('\n');
    }
    if transcript.is_empty() {
        transcript.push_str(r#"<p class="empty">No messages yet. Say hello!</p>"#);
    }

    let mut memory = String::new();
    for entry in state.memory().iter() {
        let _ = writeln!(memory, "<li>{}</li>", escape_html(entry));
    }

    let model = state
        .connection()
        .map(|c| escape_html(&c.model_name))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="layout">
<main class="chat">
<header><h1>memochat</h1><span class="model">{model}</span><a class="reset" href="/reset">New conversation</a></header>
{banner}
<div id="chat-box" class="chat-box">
{transcript}</div>
<form id="chat-form" method="post" action="/chat" class="chat-form">
<textarea id="message-input" name="message" rows="1" placeholder="Type a message..." autofocus>{pending}</textarea>
<button id="send-button" type="submit">Send</button>
</form>
</main>
<aside class="memory">
<h2>Long-term memory <span class="count">{count}</span></h2>
<ul id="memory-list">
{memory}</ul>
</aside>
</div>"#,
        banner = error_banner(error),
        pending = pending.map(escape_html).unwrap_or_default(),
        count = state.memory().len(),
    );
    layout("memochat", &body)
}
