use crate::constants::{DOUBLE_TERMINATOR, TERMINATOR};

/// Noch nicht geschriebener Terminator (X.891 C.3.6, C.3.7).
///
/// Zwei aufeinanderfolgende Terminatoren an derselben Stelle werden zu
/// `0xFF` zusammengefasst. Deshalb hält der Encoder den letzten Terminator
/// zurück, bis klar ist, was folgt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum PendingTerminator {
    #[default]
    None,
    /// Ein Terminator steht aus (`0xF0` falls nichts mehr folgt).
    Single,
    /// Zwei Terminatoren stehen aus (`0xFF`).
    Double,
}

impl PendingTerminator {
    /// Registers one more terminator. Returns the octet that has to be
    /// written right away when two were already pending.
    pub(super) fn close(&mut self) -> Option<u8> {
        match self {
            Self::None => {
                *self = Self::Single;
                None
            }
            Self::Single => {
                *self = Self::Double;
                None
            }
            Self::Double => {
                *self = Self::Single;
                Some(DOUBLE_TERMINATOR)
            }
        }
    }

    /// Takes whatever is pending as one octet.
    pub(super) fn flush(&mut self) -> Option<u8> {
        match std::mem::take(self) {
            Self::None => None,
            Self::Single => Some(TERMINATOR),
            Self::Double => Some(DOUBLE_TERMINATOR),
        }
    }

    pub(super) fn is_pending(self) -> bool {
        self != Self::None
    }
}
