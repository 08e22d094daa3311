#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

use alloc::boxed::Box;
use core::future::pending;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::Pin;
use esp_hal::timer::timg::TimerGroup;
use log::info;
use pantilt_rover::tasks::control_task::{control_task, RoverPins};
use pantilt_rover::tasks::net_task::{
    command_server_task, connection_task, http_server_task, runner_task,
};
use pantilt_rover::tasks::CommandChannel;

esp_bootloader_esp_idf::esp_app_desc!();

//MOTOR DRIVER: IN1 18, IN2 19, IN3 14, IN4 25, ENA 26, ENB 27
//SERVOS: PAN 4, TILT 5

macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.init_with(|| $val)
    }};
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let p = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);
    esp_alloc::heap_allocator!(#[unsafe(link_section = ".dram2_uninit")] size: 96 * 1024);

    let timer0 = TimerGroup::new(p.TIMG1);
    esp_hal_embassy::init(timer0.timer0);

    // take important peripherals
    let mut rng = esp_hal::rng::Rng::new(p.RNG);
    let timer1 = TimerGroup::new(p.TIMG0);
    let wifi_init = esp_wifi::init(timer1.timer0, rng, p.RADIO_CLK)
        .expect("Failed to initialize WIFI controller");
    let wifi_init = Box::leak(Box::new(wifi_init));
    let (wifi_controller, interfaces) =
        esp_wifi::wifi::new(wifi_init, p.WIFI).expect("Failed to initialize WIFI controller");

    let pins = RoverPins {
        in1: p.GPIO18.degrade(),
        in2: p.GPIO19.degrade(),
        in3: p.GPIO14.degrade(),
        in4: p.GPIO25.degrade(),
        ena: p.GPIO26.degrade(),
        enb: p.GPIO27.degrade(),
        pan: p.GPIO4.degrade(),
        tilt: p.GPIO5.degrade(),
    };

    //Get the embassy net stack up and working.
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let config = NetConfig::dhcpv4(Default::default());
    let device = interfaces.sta;
    let (stack, runner) = embassy_net::new(
        device,
        config,
        mk_static!(StackResources<4>, StackResources::new()),
        seed,
    );

    let commands: &'static CommandChannel = mk_static!(CommandChannel, CommandChannel::new());

    info!("Starting rover...");
    spawner
        .spawn(control_task(pins, p.LEDC, commands.receiver()))
        .expect("Fail spawning control task");
    spawner
        .spawn(connection_task(wifi_controller))
        .expect("Fail spawning connection task");
    spawner
        .spawn(runner_task(runner))
        .expect("Fail spawning runner task");
    spawner
        .spawn(command_server_task(stack, commands.sender()))
        .expect("Fail spawning command server task");
    spawner
        .spawn(http_server_task(stack, commands.sender()))
        .expect("Fail spawning http server task");

    loop {
        pending::<()>().await;
    }
}
