use anyhow::{Context, Result};
use clap::Args;
use dra_models::adapters::{Content, ContentPart, Message};
use std::path::PathBuf;
use tracing::info;

use super::Session;
use crate::ModeArgs;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Logical model name to send the prompt to
    pub model: String,

    /// Prompt text
    pub prompt: String,

    /// Optional system message
    #[arg(long)]
    pub system: Option<String>,

    /// Attach an audio file (for transcription models)
    #[arg(long)]
    pub audio: Option<PathBuf>,
}

pub async fn run(args: AskArgs, mode: &ModeArgs) -> Result<()> {
    let session = Session::start(mode)?;
    let entry = session.registry.get(&args.model)?;

    let conversation = build_conversation(&args);
    info!(model = %args.model, messages = conversation.len(), "sending prompt");

    let reply = entry
        .generate(&conversation)
        .await
        .with_context(|| format!("model '{}' failed", args.model))?;
    println!("{}", reply.content.as_text());
    Ok(())
}

fn build_conversation(args: &AskArgs) -> Vec<Message> {
    let mut conversation = Vec::new();
    if let Some(system) = &args.system {
        conversation.push(Message::system(system.as_str()));
    }

    let content = match &args.audio {
        Some(path) => Content::Parts(vec![
            ContentPart::Text {
                text: args.prompt.clone(),
            },
            ContentPart::Audio { path: path.clone() },
        ]),
        None => Content::text(args.prompt.as_str()),
    };
    conversation.push(Message::user(content));
    conversation
}

#[cfg(test)]
mod tests {
    use super::*;
    use dra_models::adapters::Role;

    fn args(system: Option<&str>, audio: Option<&str>) -> AskArgs {
        AskArgs {
            model: "gpt-4o".to_string(),
            prompt: "hello".to_string(),
            system: system.map(str::to_string),
            audio: audio.map(PathBuf::from),
        }
    }

    #[test]
    fn prompt_only() {
        let conversation = build_conversation(&args(None, None));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation[0].role, Role::User);
        assert_eq!(conversation[0].content.as_text(), "hello");
    }

    #[test]
    fn system_message_comes_first() {
        let conversation = build_conversation(&args(Some("be brief"), None));
        assert_eq!(conversation[0].role, Role::System);
        assert_eq!(conversation[1].role, Role::User);
    }

    #[test]
    fn audio_is_attached() {
        let conversation = build_conversation(&args(None, Some("/tmp/clip.wav")));
        assert_eq!(
            conversation[0].content.audio(),
            Some(&PathBuf::from("/tmp/clip.wav"))
        );
    }
}
