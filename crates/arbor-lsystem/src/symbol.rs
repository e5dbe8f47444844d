//! Turtle alphabet: maps single-character symbols to turtle commands.

use glam::Vec3;

/// Local rotation axis of the turtle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Turn left/right, about local Z.
    Yaw,
    /// Pitch down/up, about local X.
    Pitch,
    /// Roll about the heading, local Y.
    Roll,
}

impl Axis {
    /// Unit vector of this axis in the turtle's local frame.
    pub fn local(self) -> Vec3 {
        match self {
            Axis::Yaw => Vec3::Z,
            Axis::Pitch => Vec3::X,
            Axis::Roll => Vec3::Y,
        }
    }
}

/// A decoded turtle command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `F`, `G`: draw a segment and move forward.
    Forward,
    /// `L`, `P`: place a leaf.
    Leaf,
    /// Rotate by the configured angle; `positive` selects the sign.
    Rotate { axis: Axis, positive: bool },
    /// `|`: rotate 180° about local Z.
    TurnAround,
    /// `!`: taper mark.
    TaperMark,
    /// `[`: save state.
    Push,
    /// `]`: restore state.
    Pop,
    /// Anything else.
    Noop,
}

impl Command {
    pub const fn rotate(axis: Axis, positive: bool) -> Self {
        Command::Rotate { axis, positive }
    }

    /// Decodes one symbol. Unknown symbols map to [`Command::Noop`].
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'F' | 'G' => Command::Forward,
            'L' | 'P' => Command::Leaf,
            '+' => Command::rotate(Axis::Yaw, true),
            '-' => Command::rotate(Axis::Yaw, false),
            '&' => Command::rotate(Axis::Pitch, true),
            '^' => Command::rotate(Axis::Pitch, false),
            '\\' => Command::rotate(Axis::Roll, true),
            '/' => Command::rotate(Axis::Roll, false),
            '|' => Command::TurnAround,
            '!' => Command::TaperMark,
            '[' => Command::Push,
            ']' => Command::Pop,
            _ => Command::Noop,
        }
    }
}

/// Returns true for the forward-draw aliases.
#[inline]
pub fn is_forward(symbol: char) -> bool {
    matches!(symbol, 'F' | 'G')
}
