use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::request::HTTP_VERSION;
use crate::http::response::Response;

/// Serializes a response as `HTTP/1.0 <code> <phrase>\r\n<headers>\r\n<body>`.
pub fn serialize_response(resp: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(64 + resp.body.len());

    // Status line
    buf.put_slice(
        format!("{} {} {}\r\n", HTTP_VERSION, resp.status_code, resp.status_phrase).as_bytes(),
    );

    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf.put_slice(&resp.body);

    buf.freeze()
}

pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
    status: u16,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
            status: response.status_code,
        }
    }

    /// Status code carried by the serialized response.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> std::io::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }

            self.written += n;
        }

        stream.flush().await
    }
}
