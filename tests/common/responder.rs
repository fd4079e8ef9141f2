// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// tests/common/responder.rs - 测试用 HTTP 应答器
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use url::Url;

/// 收到的请求：请求行与请求体
#[derive(Debug, Clone)]
pub struct Received {
  pub request_line: String,
  pub body: String,
}

/// 对每个连接都返回同一个应答，直到测试结束
pub async fn serve(status: u16, body: &'static str) -> (Url, UnboundedReceiver<Received>) {
  let listener = TcpListener::bind("127.0.0.1:0")
    .await
    .expect("Failed to bind responder");
  let addr = listener.local_addr().expect("Responder has no address");
  let (tx, rx) = unbounded_channel();

  tokio::spawn(async move {
    while let Ok((stream, _)) = listener.accept().await {
      let tx = tx.clone();
      tokio::spawn(respond(stream, status, body, tx));
    }
  });

  let url = Url::parse(&format!("http://{addr}/")).expect("Invalid responder url");
  (url, rx)
}

async fn respond(mut stream: TcpStream, status: u16, body: &'static str, tx: UnboundedSender<Received>) {
  let mut buf = Vec::new();
  let mut chunk = [0u8; 4096];
  let header_end = loop {
    if let Some(pos) = find(&buf, b"\r\n\r\n") {
      break pos + 4;
    }
    match stream.read(&mut chunk).await {
      Ok(0) | Err(_) => return,
      Ok(n) => buf.extend_from_slice(&chunk[..n]),
    }
  };

  let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
  let content_length = head
    .lines()
    .filter_map(|line| line.split_once(':'))
    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
    .unwrap_or(0);

  while buf.len() < header_end + content_length {
    match stream.read(&mut chunk).await {
      Ok(0) | Err(_) => break,
      Ok(n) => buf.extend_from_slice(&chunk[..n]),
    }
  }

  let _ = tx.send(Received {
    request_line: head.lines().next().unwrap_or_default().to_string(),
    body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
  });

  let reason = if status < 400 { "OK" } else { "Error" };
  let response = format!(
    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
    body.len()
  );
  let _ = stream.write_all(response.as_bytes()).await;
  let _ = stream.shutdown().await;
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  haystack.windows(needle.len()).position(|w| w == needle)
}
