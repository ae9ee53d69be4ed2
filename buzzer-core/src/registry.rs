//! Static wiring of the buzzer board.
//!
//! Every button has one input line and two indicator lights: its own lamp
//! ("self") and a backlight on the area map ("map"). Lights are single bits
//! on 16-bit I2C port expanders, one expander per indicator group.

use core::fmt;

/// Number of buttons on the quiz board.
pub const NUM_BUTTONS: usize = 14;

/// Expander driving the lamps inside the buttons.
pub const SELF_GROUP: u8 = 0x20;
/// Expander driving the area map backlights.
pub const MAP_GROUP: u8 = 0x21;

/// BCM GPIO line of each button, indexed by button id.
///
/// Lines 0-7 follow the classic wiringPi 0-7 numbering; the rest skip
/// GPIO2/GPIO3, which carry I2C1 to the expanders.
const INPUT_LINES: [u8; NUM_BUTTONS] = [17, 18, 27, 22, 23, 24, 25, 4, 5, 6, 12, 13, 19, 26];

/// Dense button identity, `0..N`. Also selects the audio cue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ButtonId(pub u8);

impl ButtonId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One light: a bit mask within an indicator group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Indicator {
    /// 7-bit I2C address of the expander.
    pub group: u8,
    /// Port bits (P00 = bit 0 .. P17 = bit 15) that light this indicator.
    pub mask: u16,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub id: ButtonId,
    /// BCM GPIO number of the input line. Low = pressed.
    pub input: u8,
    pub self_indicator: Indicator,
    pub map_indicator: Indicator,
}

impl Button {
    const fn wired(index: usize) -> Self {
        Self {
            id: ButtonId(index as u8),
            input: INPUT_LINES[index],
            self_indicator: Indicator {
                group: SELF_GROUP,
                mask: 1 << index,
            },
            map_indicator: Indicator {
                group: MAP_GROUP,
                mask: 1 << index,
            },
        }
    }
}

/// The fourteen buttons of the quiz board, in arbitration order.
pub const QUIZ_BOARD: [Button; NUM_BUTTONS] = {
    let mut buttons = [Button::wired(0); NUM_BUTTONS];
    let mut i = 1;
    while i < NUM_BUTTONS {
        buttons[i] = Button::wired(i);
        i += 1;
    }
    buttons
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// `buttons[index].id` is not `index`.
    SparseId { index: usize, id: ButtonId },
    /// An indicator mask with no bits set can never light anything.
    EmptyMask { id: ButtonId },
    /// Two buttons read the same input line.
    SharedInput { input: u8, first: ButtonId, second: ButtonId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::SparseId { index, id } => {
                write!(f, "button at position {index} has id {id}")
            }
            RegistryError::EmptyMask { id } => write!(f, "button {id} has an empty indicator mask"),
            RegistryError::SharedInput { input, first, second } => {
                write!(f, "buttons {first} and {second} share GPIO {input}")
            }
        }
    }
}

/// Immutable table of buttons addressed by dense index.
#[derive(Clone, Debug)]
pub struct Registry<const N: usize> {
    buttons: [Button; N],
}

impl<const N: usize> Registry<N> {
    pub fn new(buttons: [Button; N]) -> Result<Self, RegistryError> {
        for (index, button) in buttons.iter().enumerate() {
            if button.id.index() != index {
                return Err(RegistryError::SparseId { index, id: button.id });
            }
            if button.self_indicator.mask == 0 || button.map_indicator.mask == 0 {
                return Err(RegistryError::EmptyMask { id: button.id });
            }
            if let Some(first) = buttons[..index].iter().find(|b| b.input == button.input) {
                return Err(RegistryError::SharedInput {
                    input: button.input,
                    first: first.id,
                    second: button.id,
                });
            }
        }
        Ok(Self { buttons })
    }

    pub fn get(&self, index: usize) -> Option<&Button> {
        self.buttons.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Button> {
        self.buttons.iter()
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl Registry<NUM_BUTTONS> {
    /// The built-in board wiring.
    pub fn quiz_board() -> Self {
        Self { buttons: QUIZ_BOARD }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_board_is_valid() {
        let registry = Registry::new(QUIZ_BOARD).unwrap();
        assert_eq!(registry.len(), NUM_BUTTONS);
        let last = registry.get(13).unwrap();
        assert_eq!(last.id, ButtonId(13));
        assert_eq!(last.self_indicator, Indicator { group: SELF_GROUP, mask: 1 << 13 });
        assert_eq!(last.map_indicator, Indicator { group: MAP_GROUP, mask: 1 << 13 });
        assert!(registry.get(14).is_none());
    }

    #[test]
    fn quiz_board_keeps_clear_of_i2c_pins() {
        assert!(QUIZ_BOARD.iter().all(|b| b.input != 2 && b.input != 3));
    }

    #[test]
    fn rejects_out_of_order_ids() {
        let mut buttons = [QUIZ_BOARD[0], QUIZ_BOARD[1]];
        buttons.swap(0, 1);
        assert_eq!(
            Registry::new(buttons).unwrap_err(),
            RegistryError::SparseId { index: 0, id: ButtonId(1) }
        );
    }

    #[test]
    fn rejects_shared_input() {
        let mut buttons = [QUIZ_BOARD[0], QUIZ_BOARD[1]];
        buttons[1].input = buttons[0].input;
        assert_eq!(
            Registry::new(buttons).unwrap_err(),
            RegistryError::SharedInput { input: 17, first: ButtonId(0), second: ButtonId(1) }
        );
    }

    #[test]
    fn rejects_empty_mask() {
        let mut buttons = [QUIZ_BOARD[0]];
        buttons[0].map_indicator.mask = 0;
        assert_eq!(Registry::new(buttons).unwrap_err(), RegistryError::EmptyMask { id: ButtonId(0) });
    }
}
