//! End-to-end frames through `InputContext` and `DeviceDirectory`.

use edgeinput::backends::virtual_input::{
    RecordingHost, VirtualControllerService, VirtualJoystick, VirtualProperties, VirtualXInput,
};
use edgeinput::directory::{is_duplicate_of_other_protocol, DeviceDirectory};
use edgeinput::backends::virtual_input::VirtualGameInput;
use edgeinput::event::{kind, HostMessage};
use edgeinput::gameinput::{GameInputDeviceInfo, GameInputDevices, GameInputKind};
use edgeinput::joystick::{JoyAxis, PollError};
use edgeinput::metadata::{DeviceClass, DeviceMeta, Guid};
use edgeinput::xinput::{mask, Side, XButton, XInputPort};
use edgeinput::{Gamepad, InputConfig, InputContext, InputError, MouseButton};

const KEY_A: u8 = b'A';

fn context() -> (InputContext, VirtualXInput) {
    let _ = env_logger::builder().is_test(true).try_init();
    let pad = VirtualXInput::connected();
    let ports: [Box<dyn XInputPort>; 4] = [
        Box::new(pad.clone()),
        Box::new(VirtualXInput::new()),
        Box::new(VirtualXInput::new()),
        Box::new(VirtualXInput::new()),
    ];
    (InputContext::new(ports, &InputConfig::default()), pad)
}

fn meta(n: u32, vid: u16, pid: u16, class: DeviceClass) -> DeviceMeta {
    DeviceMeta {
        instance: Guid::new(n, 0, 0, [0; 8]),
        product: Guid::from_vid_pid(vid, pid),
        instance_name: format!("Pad {n}"),
        product_name: "Test Pad".into(),
        class,
    }
}

#[test]
fn down_up_before_first_prepare_is_a_no_op() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    assert!(input.update(&mut host, &HostMessage::key_down(KEY_A)));
    assert!(input.update(&mut host, &HostMessage::key_up(KEY_A)));
    input.prepare();

    let a = input.keyboard()[KEY_A];
    assert!(!a.pressed && !a.held && !a.released);
}

#[test]
fn focus_loss_hard_clears_held_keys() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    input.update(&mut host, &HostMessage::key_down(KEY_A));
    input.prepare();
    assert!(input.keyboard()[KEY_A].held);

    let handled = input.update(&mut host, &HostMessage::focus_lost());
    assert!(!handled, "focus loss must reach the host's default handler");
    assert!(!input.keyboard()[KEY_A].held);

    input.prepare();
    let a = input.keyboard()[KEY_A];
    assert!(!a.held && !a.released && !a.pressed);
}

#[test]
fn focus_loss_resets_pads_and_pointer() {
    let (mut input, pad) = context();
    let mut host = RecordingHost::default();
    pad.set_buttons(mask::A);
    input.update(&mut host, &HostMessage::new(kind::LBUTTONDOWN, 0, 0));
    input.prepare();
    assert!(input.xinput().pad(0).unwrap().button(XButton::A).held);
    assert!(input.pointer()[MouseButton::Left].held);

    input.update(&mut host, &HostMessage::focus_lost());
    let p0 = input.xinput().pad(0).unwrap();
    assert!(!p0.connected());
    assert!(!p0.button(XButton::A).held);
    assert!(!input.pointer()[MouseButton::Left].held);
    assert_eq!(input.pointer().capture_count(), 0);
}

#[test]
fn edges_collapse_between_frames() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    for msg in [
        HostMessage::key_down(KEY_A),
        HostMessage::key_up(KEY_A),
        HostMessage::key_down(KEY_A),
    ] {
        input.update(&mut host, &msg);
    }
    input.prepare();
    let a = input.keyboard()[KEY_A];
    assert!(a.pressed && a.held && !a.released);

    input.prepare();
    let a = input.keyboard()[KEY_A];
    assert!(!a.pressed && a.held && !a.released);
}

#[test]
fn extra_button_ups_do_not_underflow_capture() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    input.update(&mut host, &HostMessage::new(kind::RBUTTONDOWN, 0, 0));
    for _ in 0..3 {
        input.update(&mut host, &HostMessage::new(kind::RBUTTONUP, 0, 0));
    }
    assert_eq!(input.pointer().capture_count(), 0);
    assert_eq!(host.begin_capture_calls, 1);
    assert_eq!(host.end_capture_calls, 1);
}

#[test]
fn pointer_stays_on_surface_while_captured() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    input.update(&mut host, &HostMessage::pointer_move(10, 20));
    input.update(&mut host, &HostMessage::new(kind::LBUTTONDOWN, 0, 0));
    input.update(&mut host, &HostMessage::new(kind::MOUSELEAVE, 0, 0));
    input.prepare();
    assert!(input.pointer().on_surface());
    assert_eq!((input.pointer().x(), input.pointer().y()), (10, 20));

    // release re-arms leave tracking; the next leave clears the flag
    input.update(&mut host, &HostMessage::new(kind::LBUTTONUP, 0, 0));
    assert_eq!(host.track_leave_calls, 2);
    input.update(&mut host, &HostMessage::new(kind::MOUSELEAVE, 0, 0));
    input.prepare();
    assert!(!input.pointer().on_surface());
}

#[test]
fn reset_mid_drag_releases_capture() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    input.update(&mut host, &HostMessage::new(kind::LBUTTONDOWN, 0, 0));
    input.reset(&mut host);
    input.update(&mut host, &HostMessage::new(kind::LBUTTONUP, 0, 0));
    assert_eq!(input.pointer().capture_count(), 0);
    assert_eq!(host.begin_capture_calls, 1);
    assert_eq!(host.end_capture_calls, 1);
}

#[test]
fn wheel_and_double_click_last_one_frame() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    input.update(&mut host, &HostMessage::wheel(120));
    input.update(&mut host, &HostMessage::wheel(-240));
    input.update(&mut host, &HostMessage::new(kind::MBUTTONDBLCLK, 0, 0));
    input.prepare();
    assert_eq!(input.pointer().wheel_delta(), -120);
    assert!(input.pointer().button(MouseButton::Middle).double_clicked);

    input.prepare();
    assert_eq!(input.pointer().wheel_delta(), 0);
    assert!(!input.pointer().button(MouseButton::Middle).double_clicked);
}

#[test]
fn text_recording_handles_surrogates_and_composition() {
    let (mut input, _) = context();
    let mut host = RecordingHost::default();
    input.start_text_recording();
    for unit in [u16::from(b'h'), 0xD83D, 0xDE00, 0xD83D, u16::from(b'!')] {
        input.update(&mut host, &HostMessage::char_unit(unit));
    }
    assert_eq!(input.keyboard().recorded_text(), "h\u{1F600}!");

    input.update(&mut host, &HostMessage::new(kind::IME_STARTCOMPOSITION, 0, 0));
    input.update(&mut host, &HostMessage::char_unit(u16::from(b'x')));
    assert_eq!(input.keyboard().recorded_text(), "h\u{1F600}!");

    input.start_text_recording();
    input.update(&mut host, &HostMessage::char_unit(u16::from(b'y')));
    assert_eq!(input.keyboard().recorded_text(), "h\u{1F600}!y");

    input.clear_recorded_text();
    assert!(input.keyboard().recorded_text().is_empty());
}

#[test]
fn xinput_triggers_read_their_own_side() {
    let (mut input, pad) = context();
    pad.update(|s| {
        s.left_trigger = 10;
        s.right_trigger = 200;
    });
    input.prepare();
    let p0 = input.xinput().pad(0).unwrap();
    assert!(!p0.trigger(Side::Left).outside_threshold);
    assert!(p0.trigger(Side::Right).outside_threshold);
    assert_eq!(p0.trigger(Side::Right).value, 200);
}

#[test]
fn vibration_is_forwarded_and_cleared_on_reset() {
    let (mut input, pad) = context();
    let mut host = RecordingHost::default();
    input.prepare();
    input.set_vibration(0, 1000, 2000).unwrap();
    assert_eq!(pad.vibration(), (1000, 2000));

    input.reset(&mut host);
    assert_eq!(pad.vibration(), (0, 0));
    assert_eq!(input.xinput().pad(0).unwrap().left_vibration(), 0);

    assert!(matches!(
        input.set_vibration(1, 1, 1),
        Err(InputError::Actuation)
    ));
    assert!(matches!(
        input.set_vibration(7, 1, 1),
        Err(InputError::DeviceUnavailable(_))
    ));
}

#[test]
fn attached_joystick_reacquires_once_per_frame() {
    let (mut input, _) = context();
    let service = VirtualControllerService::new();
    let stick = VirtualJoystick::new(DeviceClass::Joystick, 12, 3);
    service.plug(meta(1, 0x044F, 0xB10A, DeviceClass::Joystick), Some(stick.clone()));

    let mut dir = DeviceDirectory::discover(Box::new(service)).unwrap();
    let listed = dir.available()[0].clone();
    let id = input.attach(dir.open(&listed).unwrap());

    stick.update(|s| {
        s.buttons[0] = 0x80;
        s.axes[JoyAxis::X as usize] = 1234;
    });
    stick.push_poll_result(Err(PollError::InputLost));
    let report = input.prepare();
    assert!(report.pad_ok(id));
    assert_eq!(report.xinput, [true, false, false, false]);
    let pad = input.pad(id).unwrap();
    assert!(pad.connected());
    assert!(pad.buttons()[0].pressed);
    assert_eq!(pad.axis(JoyAxis::X), 1234);
    assert_eq!(stick.acquire_calls(), 1);

    stick.push_poll_result(Err(PollError::InputLost));
    stick.push_poll_result(Err(PollError::InputLost));
    let report = input.prepare();
    assert_eq!(report.failed_pads, vec![id]);
    assert!(!report.pad_ok(id));
    let pad = input.pad(id).unwrap();
    assert!(!pad.connected());
    assert!(!pad.buttons()[0].held);
    assert_eq!(stick.acquire_calls(), 2);

    // recovers on the next frame
    assert!(input.prepare().failed_pads.is_empty());
    assert!(input.pad(id).unwrap().buttons()[0].pressed);

    assert!(input.detach(id).is_some());
    assert!(input.pad(id).is_none());
}

#[test]
fn duplicate_identity_is_matched_by_vid_pid() {
    let service = VirtualControllerService::new();
    let x = meta(1, 1, 2, DeviceClass::Gamepad);
    let y = meta(2, 3, 4, DeviceClass::Gamepad);
    service.plug(x.clone(), None);
    service.plug(y.clone(), None);
    let dir = DeviceDirectory::discover(Box::new(service)).unwrap();

    let mut props = VirtualProperties::new([
        "HID\\VID_0001&PID_0002&IG_00\\7&1&0&0000",
        "HID\\VID_0003&PID_0004\\7&2&0&0000",
    ]);
    assert!(is_duplicate_of_other_protocol(&x.product, &mut props));
    assert!(!is_duplicate_of_other_protocol(&y.product, &mut props));

    let legacy: Vec<_> = dir.legacy_only(&mut props).into_iter().cloned().collect();
    assert_eq!(legacy, vec![y]);

    let mut broken = VirtualProperties::failing();
    assert!(!is_duplicate_of_other_protocol(&x.product, &mut broken));
    assert_eq!(dir.legacy_only(&mut broken).len(), 2);
}

#[test]
fn failed_refresh_keeps_previous_list() {
    let service = VirtualControllerService::new();
    service.plug(meta(1, 1, 2, DeviceClass::Gamepad), None);
    service.plug(meta(2, 5, 6, DeviceClass::Keyboard), None);
    let mut dir = DeviceDirectory::discover(Box::new(service.clone())).unwrap();
    assert_eq!(dir.available().len(), 1, "non-controllers are skipped");

    service.unplug_all();
    service.fail_next_enumeration();
    assert!(matches!(dir.refresh(), Err(InputError::Enumeration(_))));
    assert_eq!(dir.available().len(), 1);

    dir.refresh().unwrap();
    assert!(dir.available().is_empty());
}

#[test]
fn directory_rejects_unopenable_and_non_controller_devices() {
    let service = VirtualControllerService::new();
    let missing = meta(1, 1, 2, DeviceClass::Gamepad);
    let wheel = meta(2, 3, 4, DeviceClass::Driving);
    service.plug(missing.clone(), None);
    service.plug(
        wheel.clone(),
        Some(VirtualJoystick::new(DeviceClass::Driving, 4, 2)),
    );
    let mut dir = DeviceDirectory::discover(Box::new(service)).unwrap();

    assert!(dir.available().is_empty());
    assert!(matches!(
        dir.open(&missing),
        Err(InputError::DeviceUnavailable(_))
    ));
    assert!(matches!(
        dir.open(&wheel),
        Err(InputError::NotGameController(_))
    ));
}

#[test]
fn report_lists_available_devices() {
    let service = VirtualControllerService::new();
    service.plug(meta(9, 0x045E, 0x028E, DeviceClass::Gamepad), None);
    let dir = DeviceDirectory::discover(Box::new(service)).unwrap();
    let json = dir.report_json().unwrap();
    assert!(json.contains("Pad 9"));
    assert!(dir.find(&Guid::new(9, 0, 0, [0; 8])).is_some());
}

#[test]
fn gameinput_list_is_preferred_over_legacy_records() {
    let legacy = VirtualControllerService::new();
    let shared = meta(1, 0x045E, 0x0B12, DeviceClass::Gamepad);
    let old_stick = meta(2, 0x044F, 0xB10A, DeviceClass::Joystick);
    legacy.plug(shared.clone(), None);
    legacy.plug(old_stick.clone(), None);
    let dir = DeviceDirectory::discover(Box::new(legacy)).unwrap();

    let modern = VirtualGameInput::new();
    modern.plug(GameInputDeviceInfo {
        vendor_id: 0x045E,
        product_id: 0x0B12,
        display_name: "Xbox Wireless Controller".into(),
        device_strings: "Microsoft".into(),
        kinds: GameInputKind::GAMEPAD | GameInputKind::CONTROLLER,
        connected: true,
    });
    let gi = GameInputDevices::discover(Box::new(modern)).unwrap();

    let legacy_only: Vec<_> = dir
        .available()
        .iter()
        .filter(|m| !gi.covers(m))
        .cloned()
        .collect();
    assert_eq!(legacy_only, vec![old_stick]);
    assert!(gi.report_json().unwrap().contains("Xbox Wireless Controller"));
}
