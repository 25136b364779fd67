//! Desktop simulator for the deskdial controller UI.
//!
//! Runs a scripted crank/button session against a loopback broker (every
//! published command is echoed straight back on the matching state topic,
//! the way a broker with retained device state would answer) and prints the
//! monochrome framebuffer to the terminal as block characters.
//!
//! ```text
//! cargo run -p deskdial-simulator
//! ```

use deskdial_core::app::App;
use deskdial_core::config::{DeviceConfig, GaugeConfig, SwitchConfig};
use deskdial_core::framebuffer::FrameBuffer;
use deskdial_core::input::{InputEvent, InputEventHandler};
use deskdial_core::mqtt::MqttMessage;
use deskdial_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// Terminal cell size in panel pixels. A 400x240 panel becomes 100x30
/// characters.
const CELL_W: usize = 4;
const CELL_H: usize = 8;

/// A cell is printed as ink once this many of its pixels are on.
const INK_THRESHOLD: usize = CELL_W * CELL_H / 6;

const SWITCHES: &[SwitchConfig<'static>] = &[
    SwitchConfig {
        display_name: "Desk Lamp",
        command_topic: "home/desk_lamp/set",
        state_topic: "home/desk_lamp/state",
    },
    SwitchConfig {
        display_name: "Shelf Light",
        command_topic: "home/shelf_light/set",
        state_topic: "home/shelf_light/state",
    },
    SwitchConfig {
        display_name: "Heater",
        command_topic: "home/heater/set",
        state_topic: "home/heater/state",
    },
];

const GAUGES: &[GaugeConfig<'static>] = &[
    GaugeConfig {
        display_name: "Volume",
        percentage: 0.35,
        filled: true,
    },
    GaugeConfig {
        display_name: "Shade",
        percentage: 0.8,
        filled: false,
    },
    GaugeConfig {
        display_name: "Fan",
        percentage: 1.0,
        filled: true,
    },
];

/// Scripted input session: walk the switch list, toggle two switches, then
/// hop focus over to the gauge bars and browse them.
const SCRIPT: &[InputEvent] = &[
    InputEvent::CrankCw,
    InputEvent::APush,
    InputEvent::CrankCw,
    InputEvent::CrankCw,
    InputEvent::CrankCcw,
    InputEvent::APush,
    InputEvent::BPush,
    InputEvent::CrankCw,
    InputEvent::CrankCw,
];

fn main() {
    env_logger::init();

    let config = DeviceConfig {
        switches: SWITCHES,
        gauges: GAUGES,
    };
    let mut app = match App::new(&config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("bad configuration: {err}");
            std::process::exit(1);
        }
    };

    let mut frame = FrameBuffer::new();
    for event in SCRIPT {
        app.handle_input_event(*event);
        app.tick(&mut frame)
            .expect("framebuffer drawing is infallible");
        broker_roundtrip(&mut app);
    }

    // One more tick so the state echoes from the last events are visible.
    app.tick(&mut frame)
        .expect("framebuffer drawing is infallible");
    print_frame(&frame);
}

/// Stand-in for the bus adapter plus broker: publish everything the UI
/// queued and echo each command back on the matching state topic.
fn broker_roundtrip(app: &mut App) {
    let mut echoes = Vec::new();
    while let Some(cmd) = app.mqtt_buffer().output_queue().pop() {
        println!("PUBLISH {} {}", cmd.topic, cmd.payload);
        if let Some(switch) = SWITCHES
            .iter()
            .find(|switch| switch.command_topic == cmd.topic.as_str())
        {
            echoes.push(MqttMessage::new(switch.state_topic, cmd.payload.as_str()));
        }
    }
    for msg in echoes {
        app.mqtt_buffer().input_queue().push(msg);
    }
}

fn print_frame(frame: &FrameBuffer) {
    let cols = DISPLAY_WIDTH_PX as usize / CELL_W;
    let rows = DISPLAY_HEIGHT_PX as usize / CELL_H;
    for row in 0..rows {
        let mut line = String::with_capacity(cols);
        for col in 0..cols {
            let mut ink = 0;
            for dy in 0..CELL_H {
                for dx in 0..CELL_W {
                    if frame.pixel(col * CELL_W + dx, row * CELL_H + dy).is_on() {
                        ink += 1;
                    }
                }
            }
            line.push(if ink >= INK_THRESHOLD { '#' } else { ' ' });
        }
        println!("{line}");
    }
}
