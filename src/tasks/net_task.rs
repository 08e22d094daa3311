//! Networking: Wi-Fi station, TCP command server and HTTP control page.
//!
//! Both servers turn what they receive into [`CommandLine`]s and push them to
//! the command channel; the control task consumes them in arrival order.
//!
//! A dropped Wi-Fi link is re-established by [`connection_task`].
extern crate alloc;

use alloc::string::String;
use anyhow::anyhow;
use embassy_net::{tcp::TcpSocket, IpListenEndpoint, Runner, Stack};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use esp_wifi::config::PowerSaveMode;
use esp_wifi::wifi::{ClientConfiguration, Configuration, WifiController, WifiDevice, WifiEvent};
use log::{debug, error, info, warn};

use super::CommandSender;
use crate::config::{
    CMDLINE_CAPACITY, HTTP_PORT, PORT, RECONNECT_DELAY_MS, RX_BUF_SIZE, TX_BUF_SIZE,
};
use crate::framing::LineFramer;
use crate::http::{
    parse_request_line, percent_decode, response_head, Request, StatusCode, CONTROL_PAGE,
};
use crate::robot::commands::CommandLine;
use crate::status::STATUS_BOARD;

/// Closes the TCP session instead of being executed.
const QUIT: &str = "quit";

#[embassy_executor::task]
pub async fn runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    loop {
        if matches!(controller.is_connected(), Ok(true)) {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("[NET_TASK] Wifi disconnected");
            Timer::after_millis(RECONNECT_DELAY_MS).await;
        }

        if let Err(e) = start_and_connect(&mut controller).await {
            error!("[NET_TASK] {e}");
            Timer::after_millis(RECONNECT_DELAY_MS).await;
        }
    }
}

pub async fn start_and_connect(controller: &mut WifiController<'_>) -> anyhow::Result<()> {
    let ssid = env!("WIFI_SSID");

    if !matches!(controller.is_started(), Ok(true)) {
        let config = Configuration::Client(ClientConfiguration {
            ssid: String::from(ssid),
            password: String::from(env!("WIFI_PASS")),
            ..Default::default()
        });
        controller
            .set_configuration(&config)
            .map_err(|e| anyhow!("fail setting configuration of wifi controller: {e:?}"))?;
        controller
            .set_power_saving(PowerSaveMode::None)
            .map_err(|e| anyhow!("fail setting wifi power mode: {e:?}"))?;
        controller
            .start_async()
            .await
            .map_err(|e| anyhow!("fail starting wifi: {e:?}"))?;
    }

    info!("Connecting to wifi: {ssid}");
    controller
        .connect_async()
        .await
        .map_err(|e| anyhow!("An error occured trying to connect to wifi: {e:?}"))?;

    if let Ok(rssi) = controller.rssi() {
        info!("Wifi connected! signal: {}", rssi)
    }
    Ok(())
}

async fn wait_for_network(stack: Stack<'static>, port: u16) {
    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        info!("Listening at address {}:{}", config.address, port);
    }
}

/// Line based command server: every non-empty `\n` terminated line is one
/// command, regardless of how the stream was split into reads.
#[embassy_executor::task]
pub async fn command_server_task(stack: Stack<'static>, cmd_sender: CommandSender) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut tx_buf = [0u8; TX_BUF_SIZE];

    wait_for_network(stack, PORT).await;

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);

        match socket
            .accept(IpListenEndpoint {
                port: PORT,
                addr: None,
            })
            .await
        {
            Ok(_) => {
                info!("Client connected!");
                handle_connection(&mut socket, &cmd_sender).await;
                socket.close();
                if let Err(e) = socket.flush().await {
                    warn!("Flush failed: {:?}", e);
                }
            }
            Err(e) => {
                error!("Accept failed: {:?}", e);
                Timer::after_millis(500).await; // Backoff delay
                continue;
            }
        }
    }
}

pub async fn handle_connection(socket: &mut TcpSocket<'_>, cmd_sender: &CommandSender) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut framer = LineFramer::<CMDLINE_CAPACITY>::new();
    loop {
        match socket.read(&mut rx_buf).await {
            Ok(0) => break,
            Ok(n) => {
                for byte in &rx_buf[..n] {
                    let Some(cmd) = framer.feed(*byte) else {
                        continue;
                    };
                    if cmd == QUIT {
                        info!("Client closed the session");
                        return;
                    }
                    cmd_sender.send(cmd).await;
                }
                if framer.overflowed() {
                    warn!("Command line longer than {CMDLINE_CAPACITY} bytes, truncating");
                }
            }
            Err(e) => {
                error!("Read error: {:?}", e);
                break;
            }
        }
    }
}

/// One request per connection, answered and closed.
#[embassy_executor::task]
pub async fn http_server_task(stack: Stack<'static>, cmd_sender: CommandSender) {
    let mut rx_buf = [0u8; RX_BUF_SIZE];
    let mut tx_buf = [0u8; TX_BUF_SIZE];

    wait_for_network(stack, HTTP_PORT).await;

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);
        socket.set_timeout(Some(Duration::from_secs(10)));

        if let Err(e) = socket
            .accept(IpListenEndpoint {
                port: HTTP_PORT,
                addr: None,
            })
            .await
        {
            error!("[HTTP] Accept failed: {:?}", e);
            Timer::after_millis(500).await;
            continue;
        }

        if let Err(e) = serve_request(&mut socket, &cmd_sender).await {
            warn!("[HTTP] {e}");
        }
        socket.close();
        if let Err(e) = socket.flush().await {
            warn!("[HTTP] Flush failed: {:?}", e);
        }
    }
}

async fn serve_request(
    socket: &mut TcpSocket<'_>,
    cmd_sender: &CommandSender,
) -> anyhow::Result<()> {
    let mut buf = [0u8; RX_BUF_SIZE];
    let mut len = 0;

    // headers are not needed, stop at the end of the head or a full buffer
    while len < buf.len() {
        let n = socket
            .read(&mut buf[len..])
            .await
            .map_err(|e| anyhow!("read error: {e:?}"))?;
        if n == 0 {
            break;
        }
        len += n;
        if buf[..len].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let head = core::str::from_utf8(&buf[..len]).unwrap_or_default();
    let request_line = head.lines().next().unwrap_or_default();
    debug!("[HTTP] {request_line}");

    match parse_request_line(request_line) {
        Request::Page => respond(socket, StatusCode::Ok, "text/html", CONTROL_PAGE).await,
        Request::Status => {
            let status = STATUS_BOARD.current();
            respond(socket, StatusCode::Ok, "text/plain", &status).await
        }
        Request::Command(cmd) => {
            let line: CommandLine = percent_decode(cmd);
            cmd_sender.send(line.clone()).await;
            let mut body: heapless::String<80> = heapless::String::new();
            let _ = body.push_str("queued ");
            let _ = body.push_str(&line);
            respond(socket, StatusCode::Ok, "text/plain", &body).await
        }
        Request::NotFound => respond(socket, StatusCode::NotFound, "text/plain", "").await,
        Request::BadRequest => respond(socket, StatusCode::BadRequest, "text/plain", "").await,
    }
}

async fn respond(
    socket: &mut TcpSocket<'_>,
    code: StatusCode,
    content_type: &str,
    body: &str,
) -> anyhow::Result<()> {
    let head = response_head(code, content_type, body.len());
    socket
        .write_all(head.as_bytes())
        .await
        .map_err(|e| anyhow!("write error: {e:?}"))?;
    socket
        .write_all(body.as_bytes())
        .await
        .map_err(|e| anyhow!("write error: {e:?}"))?;
    Ok(())
}
