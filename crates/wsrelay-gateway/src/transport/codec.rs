//! Read-side classification for the session loop.
//!
//! Every read result maps to exactly one `Inbound`: a text payload to relay,
//! a frame to skip, or the terminal signal that closes the session.

use axum::extract::ws::Message;

use crate::transport::ws::CloseReason;

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    /// Client text to echo and relay.
    Text(String),
    /// Binary and control frames; pings are answered by the transport.
    Skip,
    /// The read side is done.
    Closed(CloseReason),
}

pub fn decode(read: Option<Result<Message, axum::Error>>) -> Inbound {
    match read {
        Some(Ok(Message::Text(s))) => Inbound::Text(s),
        Some(Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_))) => Inbound::Skip,
        Some(Ok(Message::Close(_))) | None => Inbound::Closed(CloseReason::ClientClosed),
        Some(Err(_)) => Inbound::Closed(CloseReason::TransportError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_relayed() {
        assert_eq!(
            decode(Some(Ok(Message::Text("hello".into())))),
            Inbound::Text("hello".into())
        );
    }

    #[test]
    fn non_text_frames_are_skipped() {
        assert_eq!(decode(Some(Ok(Message::Binary(vec![1, 2])))), Inbound::Skip);
        assert_eq!(decode(Some(Ok(Message::Ping(vec![])))), Inbound::Skip);
        assert_eq!(decode(Some(Ok(Message::Pong(vec![])))), Inbound::Skip);
    }

    #[test]
    fn every_terminal_read_closes() {
        assert_eq!(decode(Some(Ok(Message::Close(None)))), Inbound::Closed(CloseReason::ClientClosed));
        assert_eq!(decode(None), Inbound::Closed(CloseReason::ClientClosed));
        let err = axum::Error::new(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"));
        assert_eq!(decode(Some(Err(err))), Inbound::Closed(CloseReason::TransportError));
    }
}
