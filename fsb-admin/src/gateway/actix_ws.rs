//! WebSocket endpoint for live stats
//!
//! One local task per connection races the broadcaster loop against the
//! inbound reader, so either a failed push or a close frame from the
//! observer ends the task.

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{Message, MessageStream, Session};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;

use super::{SinkClosed, StatsBroadcaster, StatsSink, StreamEnd};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

#[async_trait(?Send)]
impl StatsSink for Session {
    async fn push(&mut self, payload: String) -> Result<(), SinkClosed> {
        self.text(payload).await.map_err(|_| SinkClosed)
    }
}

pub async fn ws_handler(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    state.access.authorize_with_query(&req, query.token.as_deref())?;

    let (response, session, inbound) = actix_ws::handle(&req, body)?;
    let broadcaster = Arc::clone(&state.broadcaster);
    let peer = req
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    log::debug!("Live stats observer connected: {}", peer);
    actix_web::rt::spawn(async move {
        let end = serve_observer(broadcaster, session, inbound).await;
        log::debug!("Live stats observer {} finished: {:?}", peer, end);
    });

    Ok(response)
}

async fn serve_observer(
    broadcaster: Arc<StatsBroadcaster>,
    mut session: Session,
    mut inbound: MessageStream,
) -> StreamEnd {
    let mut sink = session.clone();
    let end = tokio::select! {
        end = broadcaster.stream(&mut sink) => end,
        end = watch_inbound(&mut session, &mut inbound) => end,
    };

    // Already closed by the peer in most cases
    let _ = session.close(None).await;
    end
}

async fn watch_inbound(session: &mut Session, inbound: &mut MessageStream) -> StreamEnd {
    while let Some(msg) = inbound.next().await {
        match msg {
            Ok(Message::Ping(bytes)) => {
                if session.pong(&bytes).await.is_err() {
                    return StreamEnd::PushFailed;
                }
            }
            Ok(Message::Close(reason)) => {
                log::debug!("Observer closed connection: {:?}", reason);
                return StreamEnd::PeerClosed;
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("Observer stream error: {}", e);
                return StreamEnd::PeerClosed;
            }
        }
    }
    StreamEnd::PeerClosed
}
