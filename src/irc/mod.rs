//! Minimal IRC session: connect, register, join one channel, and feed
//! channel messages through the handler.
//!
//! The protocol surface is deliberately small: NICK/USER at startup, JOIN
//! on the numeric welcome, PONG for keepalives, and PRIVMSG both ways.
//! Replies for one inbound line are written, in order, before the next
//! line is read.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tracing::info;

use crate::config::Config;
use crate::handler::MessageHandler;
use crate::traits::{JobSource, TicketSource};

/// One parsed server line: `[:prefix] COMMAND params [:trailing]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    #[allow(dead_code)]
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl Message {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);

        let (prefix, rest) = match line.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, rest) = stripped.split_once(' ')?;
                (Some(prefix.to_string()), rest)
            }
            None => (None, line),
        };

        // everything after the first " :" is one free-form parameter
        let (head, trailing) = match rest.split_once(" :") {
            Some((head, trailing)) => (head, Some(trailing)),
            None => (rest, None),
        };

        let mut params: Vec<String> = head.split_whitespace().map(str::to_string).collect();
        if params.is_empty() {
            return None;
        }
        let command = params.remove(0);
        if let Some(trailing) = trailing {
            params.push(trailing.to_string());
        }

        Some(Self {
            prefix,
            command,
            params,
        })
    }

    /// The last parameter, usually the message text.
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }
}

pub struct Connection {
    reader: BufReader<tokio::io::ReadHalf<TcpStream>>,
    writer: BufWriter<tokio::io::WriteHalf<TcpStream>>,
}

impl Connection {
    pub async fn connect(server: &str) -> Result<Self> {
        let stream = TcpStream::connect(server)
            .await
            .with_context(|| format!("connecting to {server}"))?;
        let (read_half, write_half) = tokio::io::split(stream);

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn register(&mut self, nickname: &str) -> Result<()> {
        self.send_line(&format!("NICK {nickname}")).await?;
        self.send_line(&format!("USER {nickname} 0 * :{nickname}"))
            .await
    }

    pub async fn join(&mut self, channel: &str) -> Result<()> {
        self.send_line(&format!("JOIN {channel}")).await
    }

    pub async fn privmsg(&mut self, target: &str, text: &str) -> Result<()> {
        self.send_line(&format!("PRIVMSG {target} :{text}")).await
    }

    /// Next parsed message from the server; blank lines are skipped.
    pub async fn read_message(&mut self) -> Result<Message> {
        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                bail!("server closed the connection");
            }
            if let Some(message) = Message::parse(&line) {
                return Ok(message);
            }
        }
    }
}

/// Connect, register, and service the event stream forever. Any connection
/// or write failure propagates out and ends the process.
pub async fn run<T: TicketSource, J: JobSource>(
    config: &Config,
    handler: &MessageHandler<T, J>,
) -> Result<()> {
    info!("Connecting to {}", config.server);
    let mut connection = Connection::connect(&config.server).await?;
    connection.register(&config.nickname).await?;

    loop {
        let message = connection.read_message().await?;

        match message.command.as_str() {
            "PING" => {
                let token = message.trailing().unwrap_or_default();
                connection.send_line(&format!("PONG :{token}")).await?;
            }
            // numeric welcome: registration is done, safe to join
            "001" => {
                info!("Joining {}", config.channel);
                connection.join(&config.channel).await?;
            }
            "PRIVMSG" => {
                if let [target, text] = &message.params[..] {
                    if *target == config.channel {
                        for reply in handler.handle(text).await {
                            connection.privmsg(&config.channel, &reply).await?;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
