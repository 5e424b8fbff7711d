#![no_std]
#![no_main]

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::Executor;
use embassy_futures::select::{select4, Either4};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{I2C0, PIO0, USB};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_time::{Duration, Instant, Ticker};
use embassy_usb::class::cdc_acm::{self, CdcAcmClass};
use embassy_usb::class::hid::{self, HidWriter};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, UsbDevice};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

use airslider_firmware::config::{
    DEFAULT_BRIGHTNESS, I2C_FREQUENCY_HZ, LIGHTS_UPDATE_DIVISOR, LOG_INTERVAL_MS, REPORT_MODE,
    SLIDER_REPORT_DELAY_MS,
};
use airslider_firmware::shared::{LIGHTS_DIRTY, TOUCH};
use airslider_firmware::usb::{self as usb_dev, HID_REPORT_ID, HID_WRITE_LEN};
use airslider_firmware::{LedStrip, TouchSlider};
use core::sync::atomic::Ordering;
use slider_core::{
    LedBoardEngine, LedBoardResponse, LedImage, NkroReport, ReportMode, Rgb, SliderEngine,
    SliderResponse, DIVIDER_COUNT, KEY_COUNT, MAX_RESPONSE_PAYLOAD, REPORT_LEN,
};
use slider_proto::{
    encode_led_response, encode_slider_frame, encoded_led_max, encoded_slider_max, LedBoardParser,
    SliderParser,
};

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

type UsbDriver = Driver<'static, USB>;

/// What the device presents to the host, chosen at power-up.
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum OutputMode {
    /// Slider and LED-board protocol emulation over the serial ports.
    Arcade,
    /// NKRO keyboard with reactive lighting.
    Keyboard,
}

static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

/// USB descriptor and state buffers, alive for the device's lifetime.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 64]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static HID_STATE: StaticCell<hid::State> = StaticCell::new();
static HID_REQUEST_HANDLER: StaticCell<usb_dev::NkroRequestHandler> = StaticCell::new();
static SLIDER_PORT_STATE: StaticCell<cdc_acm::State> = StaticCell::new();
static LED0_PORT_STATE: StaticCell<cdc_acm::State> = StaticCell::new();
static LED1_PORT_STATE: StaticCell<cdc_acm::State> = StaticCell::new();

const LOG_INTERVAL: Duration = Duration::from_millis(LOG_INTERVAL_MS);

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    info!("airslider starting...");

    // Cabinet buttons, wired per config::PIN_SW_FUNCTION / _TEST /
    // _SERVICE. Holding the function button at power-up selects the
    // keyboard fallback.
    let function_button = Input::new(p.PIN_8, Pull::Up);
    let _test_button = Input::new(p.PIN_6, Pull::Up);
    let _service_button = Input::new(p.PIN_7, Pull::Up);
    let mode = if function_button.is_low() {
        OutputMode::Keyboard
    } else {
        OutputMode::Arcade
    };
    info!("output mode: {}", mode);

    // --- Touch bus (config::PIN_SCL / PIN_SDA) ---
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    // --- LED chain (config::PIN_RGB_LED) ---
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let ws2812_program = PioWs2812Program::new(&mut common);
    let ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_2, &ws2812_program);
    let strip = LedStrip::new(ws2812);

    // --- USB composite device ---
    let usb_driver = Driver::new(p.USB, Irqs);
    let mut builder = Builder::new(
        usb_driver,
        usb_dev::usb_config(),
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 64]),
        CONTROL_BUF.init([0; 64]),
    );

    let hid = usb_dev::configure_hid(
        &mut builder,
        HID_STATE.init(hid::State::new()),
        HID_REQUEST_HANDLER.init(usb_dev::NkroRequestHandler),
    );
    let slider_port =
        usb_dev::configure_serial(&mut builder, SLIDER_PORT_STATE.init(cdc_acm::State::new()));
    let led0_port =
        usb_dev::configure_serial(&mut builder, LED0_PORT_STATE.init(cdc_acm::State::new()));
    let led1_port =
        usb_dev::configure_serial(&mut builder, LED1_PORT_STATE.init(cdc_acm::State::new()));
    let device = builder.build();

    // Inputs scan on core 1; everything host-facing stays on core 0.
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| unwrap!(spawner.spawn(input_task(i2c, mode))));
        },
    );

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        unwrap!(spawner.spawn(usb_task(device)));
        match mode {
            OutputMode::Arcade => {
                unwrap!(spawner.spawn(arcade_task(slider_port, led0_port, led1_port, strip)));
            }
            OutputMode::Keyboard => {
                unwrap!(spawner.spawn(keyboard_task(hid, strip)));
            }
        }
    });
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) {
    device.run().await;
}

/// Input task - scans the touch controllers in a tight loop on core 1 and
/// publishes the results.
#[embassy_executor::task]
async fn input_task(mut i2c: I2c<'static, I2C0, i2c::Blocking>, mode: OutputMode) {
    let mut slider = TouchSlider::new();
    slider.init(&mut i2c);

    // Shadow of the per-key states, for reactive-lighting transitions.
    let mut key_states = [false; KEY_COUNT];
    let mut scan_count: u32 = 0;
    let mut log_at = Instant::now() + LOG_INTERVAL;

    loop {
        let states = *slider.scan_touch_states(&mut i2c);
        TOUCH.publish_states(&states);

        if mode == OutputMode::Arcade && REPORT_MODE == ReportMode::Pressure {
            let readouts = *slider.scan_touch_readouts(&mut i2c);
            TOUCH.publish_readouts(&readouts);
        }

        if mode == OutputMode::Keyboard {
            for (key, shadow) in key_states.iter_mut().enumerate() {
                let pressed = slider.is_key_pressed(key);
                if pressed != *shadow {
                    *shadow = pressed;
                    LIGHTS_DIRTY.store(true, Ordering::Relaxed);
                }
            }
        }

        scan_count += 1;
        let now = Instant::now();
        if now >= log_at {
            info!("[core 1] input scan rate: {} Hz", scan_count);
            log_at = now + LOG_INTERVAL;
            scan_count = 0;
        }
    }
}

/// Output task for arcade mode - multiplexes the three protocol streams
/// and the auto-report cadence, and commits deferred light updates.
#[embassy_executor::task]
async fn arcade_task(
    mut slider_port: CdcAcmClass<'static, UsbDriver>,
    mut led0_port: CdcAcmClass<'static, UsbDriver>,
    mut led1_port: CdcAcmClass<'static, UsbDriver>,
    mut strip: LedStrip<'static>,
) {
    let mut slider_parser = SliderParser::new();
    let mut led0_parser = LedBoardParser::new();
    let mut led1_parser = LedBoardParser::new();

    let mut engine = SliderEngine::new(REPORT_MODE);
    let mut board0 = LedBoardEngine::new(0);
    let mut board1 = LedBoardEngine::new(1);
    let mut image = LedImage::new(DEFAULT_BRIGHTNESS);

    let mut ticker = Ticker::every(Duration::from_millis(SLIDER_REPORT_DELAY_MS));
    let mut report_count: u32 = 0;
    let mut log_at = Instant::now() + LOG_INTERVAL;

    let mut slider_buf = [0u8; 64];
    let mut led0_buf = [0u8; 64];
    let mut led1_buf = [0u8; 64];

    loop {
        match select4(
            read_port(&mut slider_port, &mut slider_buf),
            read_port(&mut led0_port, &mut led0_buf),
            read_port(&mut led1_port, &mut led1_buf),
            ticker.next(),
        )
        .await
        {
            Either4::First(len) => {
                for index in 0..len {
                    let Some(frame) = slider_parser.push_byte(slider_buf[index]) else {
                        continue;
                    };
                    let response = engine.process_frame(&frame, &TOUCH.snapshot(), &mut image);
                    if let Some(response) = response {
                        send_slider_response(&mut slider_port, &response).await;
                    }
                }
            }
            Either4::Second(len) => {
                drain_led_stream(
                    &mut led0_port,
                    &mut led0_parser,
                    &mut board0,
                    &mut image,
                    &led0_buf[..len],
                )
                .await;
            }
            Either4::Third(len) => {
                drain_led_stream(
                    &mut led1_port,
                    &mut led1_parser,
                    &mut board1,
                    &mut image,
                    &led1_buf[..len],
                )
                .await;
            }
            Either4::Fourth(()) => {
                // Hold the report back while the host is mid-frame on the
                // same stream.
                if engine.auto_send_reports() && !slider_parser.in_progress() {
                    let report = engine.build_report(&TOUCH.snapshot());
                    send_slider_response(&mut slider_port, &report).await;
                    report_count += 1;
                }
            }
        }

        if image.take_dirty() {
            strip.commit(&image).await;
        }

        let now = Instant::now();
        if now >= log_at {
            info!("[core 0] report rate: {} Hz", report_count);
            log_at = now + LOG_INTERVAL;
            report_count = 0;
        }
    }
}

/// Output task for keyboard mode - streams NKRO reports at the HID poll
/// rate and commits reactive lighting every few frames.
#[embassy_executor::task]
async fn keyboard_task(mut hid: HidWriter<'static, UsbDriver, HID_WRITE_LEN>, mut strip: LedStrip<'static>) {
    let mut report = NkroReport::new();
    let mut image = LedImage::new(DEFAULT_BRIGHTNESS);

    // Idle palette until the first touch.
    for key in 0..KEY_COUNT {
        image.set_key(key, Rgb::YELLOW);
    }
    for divider in 0..DIVIDER_COUNT {
        image.set_divider(divider, Rgb::PURPLE);
    }
    strip.commit(&image).await;

    let mut lights_limiter: u32 = 0;
    let mut output_count: u32 = 0;
    let mut lights_count: u32 = 0;
    let mut log_at = Instant::now() + LOG_INTERVAL;

    loop {
        let snapshot = TOUCH.snapshot();

        report.clear();
        report.set_slider_sensors(&snapshot.touched);
        let mut write_buf = [0u8; HID_WRITE_LEN];
        write_buf[0] = HID_REPORT_ID;
        write_buf[1..].copy_from_slice(report.as_bytes());
        // The write completing is the pacing: the host polls at 1 kHz. A
        // failed write just drops this frame.
        let _ = hid.write(&write_buf).await;
        output_count += 1;

        if lights_limiter == LIGHTS_UPDATE_DIVISOR - 1 {
            if LIGHTS_DIRTY.swap(false, Ordering::Relaxed) {
                for key in 0..KEY_COUNT {
                    let color = if snapshot.is_key_pressed(key) {
                        Rgb::BLUE
                    } else {
                        Rgb::YELLOW
                    };
                    image.set_key(key, color);
                }
                strip.commit(&image).await;
            }
            lights_limiter = 0;
            lights_count += 1;
        } else {
            lights_limiter += 1;
        }

        let now = Instant::now();
        if now >= log_at {
            info!(
                "[core 0] output rate: {} Hz | lights pace: {} Hz",
                output_count, lights_count
            );
            log_at = now + LOG_INTERVAL;
            output_count = 0;
            lights_count = 0;
        }
    }
}

/// Read one packet from a serial port, waiting through disconnects.
async fn read_port(port: &mut CdcAcmClass<'static, UsbDriver>, buf: &mut [u8]) -> usize {
    loop {
        match port.read_packet(buf).await {
            Ok(len) => return len,
            Err(EndpointError::Disabled) => port.wait_connection().await,
            Err(EndpointError::BufferOverflow) => {}
        }
    }
}

/// Feed one chunk of an LED-board stream through its parser and engine,
/// sending whatever responses come back.
async fn drain_led_stream(
    port: &mut CdcAcmClass<'static, UsbDriver>,
    parser: &mut LedBoardParser,
    board: &mut LedBoardEngine,
    image: &mut LedImage,
    bytes: &[u8],
) {
    for &byte in bytes {
        let Some(frame) = parser.push_byte(byte) else {
            continue;
        };
        let response = board.process_frame(&frame, image);
        if let Some(response) = response {
            send_led_response(port, &response).await;
        }
    }
}

async fn send_slider_response(
    port: &mut CdcAcmClass<'static, UsbDriver>,
    response: &SliderResponse,
) {
    let mut out = [0u8; encoded_slider_max(REPORT_LEN)];
    if let Ok(len) = encode_slider_frame(response.command.id(), &response.data, &mut out) {
        write_all(port, &out[..len]).await;
    }
}

async fn send_led_response(
    port: &mut CdcAcmClass<'static, UsbDriver>,
    response: &LedBoardResponse,
) {
    let mut out = [0u8; encoded_led_max(MAX_RESPONSE_PAYLOAD)];
    if let Ok(len) = encode_led_response(response.command.id(), &response.payload, &mut out) {
        write_all(port, &out[..len]).await;
    }
}

/// Write a frame to a serial port in endpoint-sized chunks. A failed
/// write drops the rest of the frame; the host re-syncs on the next sync
/// byte.
async fn write_all(port: &mut CdcAcmClass<'static, UsbDriver>, data: &[u8]) {
    let max_packet = usize::from(port.max_packet_size());
    let needs_zlp = !data.is_empty() && data.len() % max_packet == 0;

    let mut rest = data;
    while !rest.is_empty() {
        let chunk = rest.len().min(max_packet);
        if port.write_packet(&rest[..chunk]).await.is_err() {
            return;
        }
        rest = &rest[chunk..];
    }

    if needs_zlp {
        let _ = port.write_packet(&[]).await;
    }
}
