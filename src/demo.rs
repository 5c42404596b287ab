//! Demo action, event trigger and cron trigger handlers.

use std::sync::Arc;

use axum::Router;
use hasura_protocol::{CronPayload, EventTriggerPayload, HasuraError, HasuraErrorCode};
use hasura_router::{
    ActionContext, ActionHandlers, ActionRouter, CronContext, CronHandlers, CronRouter,
    EventContext, EventHandlers, EventRouter, RouterError,
};
use hasura_transport::mount;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::info;

#[derive(Debug, Deserialize)]
struct HelloInput {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct Message {
    message: String,
}

impl Message {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

async fn go_hello(ctx: ActionContext, input: Box<RawValue>) -> anyhow::Result<Message> {
    let input: HelloInput = serde_json::from_str(input.get())?;
    ctx.tracer.with_field("greeting", input.message.as_str());
    Ok(Message::new(input.message))
}

async fn go_failure(_ctx: ActionContext, _input: Box<RawValue>) -> Result<Message, HasuraError> {
    Err(HasuraError::new(
        HasuraErrorCode::Custom("action_failure".into()),
        "fail action",
    ))
}

async fn go_user_insert(
    _ctx: EventContext,
    payload: EventTriggerPayload,
) -> Result<Message, HasuraError> {
    info!(id = %payload.id, new = payload.event.data.new.get(), "User inserted");
    Ok(Message::new("world!"))
}

async fn go_user_update(
    _ctx: EventContext,
    _payload: EventTriggerPayload,
) -> Result<Message, HasuraError> {
    Err(HasuraError::new(
        HasuraErrorCode::Custom("event_failure".into()),
        "fail event",
    ))
}

async fn go_cron_success(_ctx: CronContext, payload: CronPayload) -> Result<Message, HasuraError> {
    info!(scheduled_time = %payload.scheduled_time, "Cron fired");
    Ok(Message::new("success!"))
}

async fn go_cron_failure(_ctx: CronContext, _payload: CronPayload) -> Result<Message, HasuraError> {
    Err(HasuraError::new(
        HasuraErrorCode::Custom("cron_failure".into()),
        "fail cron event",
    ))
}

pub fn action_router(debug: bool) -> Result<ActionRouter, RouterError> {
    let handlers = ActionHandlers::new()
        .register("goHello", go_hello)
        .register("goFailure", go_failure);
    Ok(ActionRouter::new(handlers)?.with_debug(debug))
}

pub fn event_router(debug: bool) -> Result<EventRouter, RouterError> {
    let handlers = EventHandlers::new()
        .register("goUserInsert", go_user_insert)
        .register("goUserUpdate", go_user_update);
    Ok(EventRouter::new(handlers)?.with_debug(debug))
}

pub fn cron_router(debug: bool) -> Result<CronRouter, RouterError> {
    let handlers = CronHandlers::new()
        .register("goCronSuccess", go_cron_success)
        .register("goCronFailure", go_cron_failure);
    Ok(CronRouter::new(handlers)?.with_debug(debug))
}

/// All three routers mounted at `/actions`, `/events` and `/crons`.
pub fn routes(debug: bool) -> Result<Router, RouterError> {
    Ok(Router::new()
        .merge(mount(Arc::new(action_router(debug)?), "/actions"))
        .merge(mount(Arc::new(event_router(debug)?), "/events"))
        .merge(mount(Arc::new(cron_router(debug)?), "/crons")))
}
