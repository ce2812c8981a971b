/// Gamepad input tracker using gilrs.
///
/// D-pad and left stick produce one move request per press (edge-triggered).
/// The quit mapping comes from `[gamepad] quit` in config.toml.
/// Without the `gamepad` feature this is an inert stub.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::grid::Direction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical face/shoulder buttons usable for the quit mapping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South  => Some(Btn::A),
            Button::East   => Some(Btn::B),
            Button::West   => Some(Btn::X),
            Button::North  => Some(Btn::Y),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last `update()`.
    pressed: Vec<Btn>,
    /// Direction requests since the last `update()`, oldest first.
    moves: Vec<Direction>,

    // Stick, digitized against the deadzone
    stick_x: f32,
    stick_y: f32,
    stick_dir: Option<Direction>,

    quit_buttons: Vec<Btn>,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = match Gilrs::new() {
            Ok(g) => {
                if let Some((_, pad)) = g.gamepads().next() {
                    log::info!("gamepad found: {}", pad.name());
                }
                Some(g)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            pressed: Vec::new(),
            moves: Vec::new(),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            quit_buttons: vec![Btn::Select],
        }
    }

    /// Load the quit mapping from config. Unknown names are skipped;
    /// an empty result keeps the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let quit: Vec<Btn> = cfg.quit.iter().filter_map(|s| Btn::from_name(s)).collect();
        if !quit.is_empty() {
            self.quit_buttons = quit;
        }
    }

    pub fn update(&mut self) {
        self.pressed.clear();
        self.moves.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                    self.update_stick();
                }
                EventType::Connected => log::info!("gamepad connected"),
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        let dir = match gilrs_btn {
            Button::DPadUp    => Some(Direction::Up),
            Button::DPadDown  => Some(Direction::Down),
            Button::DPadLeft  => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = dir {
            self.moves.push(dir);
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.pressed.push(btn);
        }
    }

    /// Emit a move when the stick enters a new direction zone.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn update_stick(&mut self) {
        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.moves.push(d);
            }
            self.stick_dir = dir;
        }
    }

    // ── Queries ──

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.moves.iter().copied()
    }

    pub fn quit_pressed(&self) -> bool {
        self.pressed.iter().any(|b| self.quit_buttons.contains(b))
    }
}

/// Dominant stick axis past the deadzone. gilrs reports Y up as positive.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x < 0.0 { Direction::Left } else { Direction::Right })
    } else {
        Some(if y > 0.0 { Direction::Up } else { Direction::Down })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_inside_deadzone_is_neutral() {
        assert_eq!(stick_direction(0.1, -0.2), None);
    }

    #[test]
    fn stick_picks_dominant_axis() {
        assert_eq!(stick_direction(-0.9, 0.3), Some(Direction::Left));
        assert_eq!(stick_direction(0.2, 0.8), Some(Direction::Up));
        assert_eq!(stick_direction(0.1, -0.6), Some(Direction::Down));
    }

    #[test]
    fn stick_moves_once_per_zone_entry() {
        let mut gp = GamepadState::new();
        gp.stick_x = 0.9;
        gp.update_stick();
        gp.stick_x = 0.95;
        gp.update_stick();
        assert_eq!(gp.directions().collect::<Vec<_>>(), vec![Direction::Right]);
    }

    #[test]
    fn quit_mapping_from_config() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&GamepadConfig { quit: vec!["start".into(), "bogus".into()] });
        assert_eq!(gp.quit_buttons, vec![Btn::Start]);

        gp.load_button_config(&GamepadConfig { quit: vec!["nope".into()] });
        assert_eq!(gp.quit_buttons, vec![Btn::Start]);

        gp.pressed.push(Btn::Start);
        assert!(gp.quit_pressed());
    }
}
