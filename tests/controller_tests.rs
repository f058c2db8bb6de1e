use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

use nova_client::config::Config;
use nova_client::message::MessageRole;
use nova_client::render::HtmlView;
use nova_client::services::controller::ChatController;
use nova_client::services::markdown::BasicMarkdown;
use nova_client::services::transport::ApiClient;

#[derive(Default)]
struct StubChat {
    id: String,
    title: String,
    messages: Vec<(String, String)>,
}

#[derive(Default)]
struct Backend {
    chats: Vec<StubChat>,
    fail_send: bool,
}

type Shared = Arc<Mutex<Backend>>;

async fn spawn_backend() -> (Shared, Config) {
    let state: Shared = Arc::default();
    let app = Router::new()
        .route("/send_message", post(send_message))
        .route("/new_chat", post(new_chat))
        .route("/get_chat_history", get(get_chat_history))
        .route("/get_messages/{chat_id}", get(get_messages))
        .route("/update_chat_title/{chat_id}", post(update_chat_title))
        .route("/clear_history", post(clear_history))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config {
        base_url: format!("http://{addr}"),
        request_timeout: Duration::from_secs(5),
        debounce: Duration::from_millis(50),
    };
    (state, config)
}

async fn send_message(State(state): State<Shared>, Json(payload): Json<Value>) -> Json<Value> {
    let mut backend = state.lock().await;
    if backend.fail_send {
        return Json(json!({ "error": "model overloaded" }));
    }
    let chat_id = payload["chat_id"].as_str().unwrap_or_default().to_string();
    let message = payload["message"].as_str().unwrap_or_default().to_string();
    let reply = format!("You said: **{message}**");
    if let Some(chat) = backend.chats.iter_mut().find(|c| c.id == chat_id) {
        chat.messages.push(("user".to_string(), message));
        chat.messages.push(("bot".to_string(), reply.clone()));
    }
    Json(json!({ "response": reply }))
}

async fn new_chat(State(state): State<Shared>) -> Json<Value> {
    let mut backend = state.lock().await;
    let id = Uuid::new_v4().to_string();
    backend.chats.push(StubChat {
        id: id.clone(),
        ..StubChat::default()
    });
    Json(json!({ "chat_id": id }))
}

async fn get_chat_history(State(state): State<Shared>) -> Json<Value> {
    let backend = state.lock().await;
    let chats: Vec<Value> = backend
        .chats
        .iter()
        .map(|c| json!({ "id": c.id, "title": c.title, "created_at": "2026-01-01 00:00:00" }))
        .collect();
    Json(json!({ "chats": chats }))
}

async fn get_messages(State(state): State<Shared>, Path(chat_id): Path<String>) -> Json<Value> {
    let backend = state.lock().await;
    let messages = backend
        .chats
        .iter()
        .find(|c| c.id == chat_id)
        .map(|c| c.messages.clone())
        .unwrap_or_default();
    Json(json!({ "messages": messages }))
}

async fn update_chat_title(
    State(state): State<Shared>,
    Path(chat_id): Path<String>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    let mut backend = state.lock().await;
    if let Some(chat) = backend.chats.iter_mut().find(|c| c.id == chat_id) {
        chat.title = payload["title"].as_str().unwrap_or_default().to_string();
    }
    Json(json!({ "status": "ok" }))
}

async fn clear_history(State(state): State<Shared>) -> Json<Value> {
    state.lock().await.chats.clear();
    Json(json!({ "status": "ok" }))
}

fn controller_for(config: &Config) -> ChatController<HtmlView, BasicMarkdown> {
    let api = ApiClient::new(config).unwrap();
    ChatController::new(api, HtmlView::new(), BasicMarkdown)
}

#[tokio::test]
async fn first_send_creates_a_chat_before_sending() {
    let (state, config) = spawn_backend().await;
    let mut controller = controller_for(&config);
    assert!(controller.current_chat().is_none());

    controller.send_message("Hi").await;

    let backend = state.lock().await;
    assert_eq!(backend.chats.len(), 1);
    let chat = &backend.chats[0];
    // the freshly allocated id went into the send payload
    assert_eq!(chat.messages.first(), Some(&("user".to_string(), "Hi".to_string())));
    assert_eq!(controller.current_chat(), Some(chat.id.as_str()));

    let html = controller.view().messages_html();
    assert!(html.contains("You said: <strong>Hi</strong>"));
    assert!(!controller.view().is_loading());
}

#[tokio::test]
async fn empty_message_is_a_silent_noop() {
    let (state, config) = spawn_backend().await;
    let mut controller = controller_for(&config);

    controller.send_message("   ").await;

    assert!(controller.current_chat().is_none());
    assert!(state.lock().await.chats.is_empty());
    assert_eq!(controller.view().message_count(), 0);
}

#[tokio::test]
async fn new_chat_does_not_allocate_while_the_active_chat_is_empty() {
    let (state, config) = spawn_backend().await;
    let mut controller = controller_for(&config);

    controller.new_chat().await;
    controller.new_chat().await;
    assert_eq!(state.lock().await.chats.len(), 1);

    controller.send_message("now it has messages").await;
    controller.new_chat().await;
    assert_eq!(state.lock().await.chats.len(), 2);
}

#[tokio::test]
async fn title_comes_from_the_first_user_message() {
    let (state, config) = spawn_backend().await;
    let mut controller = controller_for(&config);

    controller
        .send_message("Hello, world! This is a pretty long test message indeed")
        .await;

    let backend = state.lock().await;
    assert_eq!(backend.chats[0].title, "Hello world This is a pretty");
    drop(backend);

    // only the first exchange sets the title
    controller.send_message("Another message entirely").await;
    assert_eq!(
        state.lock().await.chats[0].title,
        "Hello world This is a pretty"
    );
}

#[tokio::test]
async fn loading_a_chat_renders_its_history_and_moves_the_highlight() {
    let (state, config) = spawn_backend().await;
    {
        let mut backend = state.lock().await;
        backend.chats.push(StubChat {
            id: "chat-a".to_string(),
            title: "First".to_string(),
            messages: vec![
                ("user".to_string(), "hey".to_string()),
                ("bot".to_string(), "**hi** there".to_string()),
            ],
        });
        backend.chats.push(StubChat {
            id: "chat-b".to_string(),
            title: "Second".to_string(),
            messages: vec![("user".to_string(), "other".to_string())],
        });
    }
    let mut controller = controller_for(&config);

    controller.load_chat("chat-a").await;
    let html = controller.view().messages_html();
    assert!(html.contains("hey"));
    assert!(html.contains("<strong>hi</strong> there"));
    assert_eq!(controller.current_chat(), Some("chat-a"));

    controller.load_chat("chat-b").await;
    let sidebar = controller.view().sidebar_html();
    assert_eq!(sidebar.matches("chat-item active").count(), 1);
    assert!(
        sidebar
            .lines()
            .find(|line| line.contains("active"))
            .is_some_and(|line| line.contains("data-id=\"chat-b\""))
    );
}

#[tokio::test]
async fn backend_error_is_surfaced_and_retry_resends() {
    let (state, config) = spawn_backend().await;
    let mut controller = controller_for(&config);

    state.lock().await.fail_send = true;
    controller.send_message("Hi").await;
    assert!(!controller.view().is_loading());
    assert!(
        controller
            .view()
            .messages_html()
            .contains("Error: model overloaded")
    );

    state.lock().await.fail_send = false;
    controller.retry_last().await;
    assert!(
        controller
            .view()
            .messages_html()
            .contains("You said: <strong>Hi</strong>")
    );
}

#[tokio::test]
async fn connection_failure_is_surfaced_as_connect_error() {
    // bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        base_url: format!("http://{addr}"),
        request_timeout: Duration::from_secs(2),
        debounce: Duration::from_millis(50),
    };
    let mut controller = controller_for(&config);

    controller.send_message("Hi").await;
    assert!(
        controller
            .view()
            .messages_html()
            .contains("Error: Could not connect to the server")
    );
    assert!(!controller.view().is_loading());
    assert!(controller.current_chat().is_none());
}

#[tokio::test]
async fn clear_history_returns_to_the_welcome_view() {
    let (state, config) = spawn_backend().await;
    let mut controller = controller_for(&config);

    controller.send_message("Hi").await;
    assert!(controller.current_chat().is_some());

    controller.clear_history().await;
    assert!(controller.current_chat().is_none());
    assert!(state.lock().await.chats.is_empty());
    assert!(controller.view().showing_welcome());
    assert!(controller.view().sidebar_html().is_empty());
}

#[tokio::test]
async fn any_role_other_than_user_is_the_assistant() {
    let (state, config) = spawn_backend().await;
    {
        let mut backend = state.lock().await;
        backend.chats.push(StubChat {
            id: "chat-x".to_string(),
            title: String::new(),
            messages: vec![
                ("user".to_string(), "a".to_string()),
                ("bot".to_string(), "b".to_string()),
                ("assistant".to_string(), "c".to_string()),
            ],
        });
    }
    let api = ApiClient::new(&config).unwrap();
    let messages = api.get_messages("chat-x").await.unwrap();
    let roles: Vec<MessageRole> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::Assistant
        ]
    );
}
