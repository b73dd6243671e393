use futures::stream::StreamExt;
use prelude::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

pub mod prelude;
pub mod receiver;
pub mod sender;

#[async_trait::async_trait]
pub trait Handler {
    /// Handles one received datagram. Returns `None` to drop it silently
    /// (malformed input, or a query carrying no question) rather than reply.
    async fn handle(&self, message: Message) -> Option<Message>;
}

pub struct UdpServer<H> {
    address: SocketAddr,
    handler: H,
}

impl<H: Handler> UdpServer<H> {
    pub fn new(address: SocketAddr, handler: H) -> Self {
        Self { address, handler }
    }

    /// Binds the socket and serves datagrams until SIGINT. Each datagram is
    /// handled as its own asynchronous unit of work (bounded to 64
    /// in-flight at once), so one query waiting on a slow upstream never
    /// blocks the others; shutdown is observed between turns rather than by
    /// a global mutable flag reached from the signal handler.
    pub async fn run(&self) -> std::io::Result<()> {
        let socket = UdpSocket::bind(self.address).await?;
        let socket = Arc::new(socket);
        tracing::info!("listening on {:?}", self.address);

        let receiver = receiver::Receiver::new(socket.clone());
        let sender = sender::Sender::new(socket);

        let stream = receiver
            .into_stream()
            .map(|item| async { self.handler.handle(item).await })
            .buffer_unordered(64);

        tokio::pin!(stream);

        loop {
            tokio::select! {
                item = stream.next() => {
                    match item {
                        Some(Some(message)) => {
                            if let Err(error) = sender.send(&message).await {
                                tracing::error!("couldn't send message to {:?}: {error:?}", message.address);
                            }
                        }
                        Some(None) => {}
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received shutdown signal, stopping server");
                    break;
                }
            }
        }

        Ok(())
    }
}
