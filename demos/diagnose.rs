use edgeinput::backends::hid::HidProperties;
use edgeinput::directory::{tagged_vid_pid, PropertySource};

fn main() {
    env_logger::init();
    let mut props = HidProperties::new().expect("init hidapi");
    for id in props.device_ids().expect("list devices") {
        match tagged_vid_pid(&id) {
            Some(packed) => println!(
                "xinput  VID:PID={:04x}:{:04x} {id}",
                packed & 0xFFFF,
                packed >> 16
            ),
            None => println!("other   {id}"),
        }
    }
}
