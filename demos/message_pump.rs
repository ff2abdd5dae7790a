//! Drives an `InputContext` from a scripted message stream.
//!
//! `RUST_LOG=edgeinput=debug cargo run --example message_pump`

use edgeinput::backends::virtual_input::{RecordingHost, VirtualXInput};
use edgeinput::event::HostMessage;
use edgeinput::keyboard::vk;
use edgeinput::xinput::{mask, XButton, XInputPort};
use edgeinput::{InputConfig, InputContext, MouseButton};

fn main() {
    env_logger::init();

    let pad = VirtualXInput::connected();
    let ports: [Box<dyn XInputPort>; 4] = [
        Box::new(pad.clone()),
        Box::new(VirtualXInput::new()),
        Box::new(VirtualXInput::new()),
        Box::new(VirtualXInput::new()),
    ];
    let mut input = InputContext::new(ports, &InputConfig::default());
    let mut host = RecordingHost::default();

    let frames: Vec<Vec<HostMessage>> = vec![
        vec![HostMessage::key_down(vk::SPACE), HostMessage::pointer_move(40, 12)],
        vec![HostMessage::key_up(vk::SPACE), HostMessage::wheel(120)],
        vec![HostMessage::new(edgeinput::event::kind::LBUTTONDOWN, 0, 0)],
        vec![HostMessage::new(edgeinput::event::kind::LBUTTONUP, 0, 0)],
        vec![HostMessage::focus_lost()],
    ];

    input.start_text_recording();
    for (n, frame) in frames.iter().enumerate() {
        for msg in frame {
            let handled = input.update(&mut host, msg);
            if !handled {
                println!("frame {n}: kind 0x{:04x} -> default handling", msg.kind);
            }
        }
        if n == 1 {
            pad.set_buttons(mask::A);
        }
        let report = input.prepare();
        if !report.xinput[0] {
            println!("frame {n}: pad 0 not connected");
        }

        let space = input.keyboard()[vk::SPACE];
        let left = input.pointer()[MouseButton::Left];
        let a = input.xinput().pad(0).map(|p| *p.button(XButton::A));
        println!(
            "frame {n}: space={space:?} lmb={left:?} pos=({}, {}) wheel={} pad0.A={a:?}",
            input.pointer().x(),
            input.pointer().y(),
            input.pointer().wheel_delta(),
        );
    }
    println!("host calls: {host:?}");
}
