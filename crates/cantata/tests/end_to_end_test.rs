//! End-to-end runs through the standard connector adapters.

mod test_utils;

use cantata::{
    Action, Batch, CantataConfig, CantataErrorKind, ChatConnector, ConnectorStyle, FragmentKind,
    Message, Prompt, Role, SingleTurnConnector, Template,
};
use futures_util::StreamExt;
use serde_json::json;
use test_utils::{CapturedLogs, ScriptedChat, ScriptedCompletion};

fn outline_then_sections() -> Template {
    Template::from_fn(|bindings| {
        let topic = bindings.param_str("topic")?.to_string();
        let sections = bindings.map("outline", |heading, index| {
            let heading = heading.as_str().unwrap_or_default().to_string();
            Action::sequence([
                Action::user([Action::text(format!("Write section {}: {heading}", index + 1))]),
                match cantata::GenDirective::new(&format!("sections[{index}]")) {
                    Ok(directive) => Action::assistant([Action::from(directive)]),
                    Err(e) => Action::text(e.to_string()),
                },
            ])
        })?;
        let chat_hint = match bindings.style() {
            ConnectorStyle::Chat => "Reply with one line.",
            ConnectorStyle::SingleTurn => "Reply with one line, then stop.",
        };
        Ok(vec![
            Batch::system([Action::text(chat_hint)]),
            Batch::user([Action::text(format!("Outline an essay on {topic}."))]),
            Batch::assistant([Action::generate("title")?]),
            Batch::system([Action::from(sections)]),
        ])
    })
}

#[tokio::test]
async fn test_chat_run_streams_and_collects_outputs() -> anyhow::Result<()> {
    let backend = ScriptedChat::new(&[&["Tea", " Time"], &["Steep."], &["Sip."]]);
    let prompt = Prompt::new(outline_then_sections(), ChatConnector::new(backend.clone()));
    assert_eq!(prompt.style(), ConnectorStyle::Chat);

    let mut run = prompt.run(json!({"topic": "tea", "outline": ["Brewing", "Drinking"]}));
    let mut generated = Vec::new();
    while let Some(step) = run.next().await {
        let step = step?;
        if *step.fragment().kind() == FragmentKind::Generated {
            generated.push(step.fragment().text().clone());
        }
    }
    assert_eq!(generated, vec!["Tea", " Time", "Steep.", "Sip."]);
    assert_eq!(
        run.outputs().as_value(),
        &json!({
            "title": "Tea Time",
            "outline": ["Brewing", "Drinking"],
            "sections": ["Steep.", "Sip."],
        })
    );

    let seen = backend.seen();
    assert_eq!(seen.len(), 3);
    assert_eq!(
        seen[0],
        vec![
            Message::new(Role::System, "Reply with one line."),
            Message::new(Role::User, "Outline an essay on tea."),
        ]
    );
    // Later calls see earlier replies as assistant messages.
    assert!(seen[1].contains(&Message::new(Role::Assistant, "Tea Time")));
    assert_eq!(
        seen[2].last(),
        Some(&Message::new(Role::User, "Write section 2: Drinking"))
    );
    Ok(())
}

#[tokio::test]
async fn test_single_turn_run_uses_configured_format() -> anyhow::Result<()> {
    let config = CantataConfig::from_toml_str(
        r#"
        [prompt_format]
        user_prefix = "\nQ: "
        assistant_prefix = "\nA: "
        default_stop = "\nQ:"
        "#,
    )?;
    let backend = ScriptedCompletion::new(&[&["Steeping"]]);
    let connector = SingleTurnConnector::new(backend.clone(), config.prompt_format().clone());
    let template = Template::from_batches([
        Batch::user([Action::text("What is tea making called?")]),
        Batch::assistant([Action::generate("answer")?]),
    ]);

    let aggregate = Prompt::new(template, connector)
        .with_config(&config)
        .run(json!({}))
        .await?;

    assert_eq!(aggregate.outputs().as_value(), &json!({"answer": "Steeping"}));
    assert_eq!(
        backend.seen(),
        vec![(
            "\nQ: What is tea making called?\nA: ".to_string(),
            Some("\nQ:".to_string())
        )]
    );
    Ok(())
}

#[tokio::test]
async fn test_backend_error_surfaces_unmodified() -> anyhow::Result<()> {
    let backend = ScriptedChat::new(&[]);
    let template = Template::from_batches([Batch::assistant([Action::generate("answer")?])]);
    let prompt = Prompt::new(template, ChatConnector::new(backend));

    let err = prompt.run(json!({})).await.unwrap_err();
    match err.kind() {
        CantataErrorKind::Backend(e) => assert_eq!(e.message, "script exhausted"),
        other => panic!("expected backend error, got {other}"),
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn test_backend_error_is_returned_without_warnings() -> anyhow::Result<()> {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let template = Template::from_batches([Batch::assistant([Action::generate("answer")?])]);
    let chat = Prompt::new(template.clone(), ChatConnector::new(ScriptedChat::new(&[])));
    assert!(chat.run(json!({})).await.is_err());

    let format = cantata::PromptFormat::default();
    let single = SingleTurnConnector::new(ScriptedCompletion::new(&[]), format);
    assert!(Prompt::new(template, single).run(json!({})).await.is_err());

    assert_eq!(logs.contents(), "");
    Ok(())
}

#[tokio::test]
async fn test_one_prompt_serves_parallel_runs() -> anyhow::Result<()> {
    let backend = ScriptedChat::new(&[&["x"], &["y"]]);
    let template = Template::from_batches([Batch::assistant([Action::generate("answer")?])]);
    let prompt = Prompt::new(template, ChatConnector::new(backend));

    let left = prompt.run(json!({}));
    left.input("answer", "typed");
    let right = prompt.run(json!({}));

    let (left, right) = tokio::join!(left.aggregate(), right.aggregate());
    assert_eq!(left?.outputs().as_value(), &json!({"answer": "typed"}));
    assert_eq!(right?.outputs().as_value(), &json!({"answer": "x"}));
    Ok(())
}
