use std::fmt::Display;
use std::ops::{Index, IndexMut};

use crate::error::Error;

pub const CHANNELS: usize = 3;

const RED_INDEX: usize = 0;
const GREEN_INDEX: usize = 1;
const BLUE_INDEX: usize = 2;

/// A color pixel made of a red, a green and a blue component.
///
/// The components live in a single array. The named getters and the
/// subscript operator are two views onto that array, so `pixel.red()` and
/// `pixel[0]` always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RGBPixel<T> {
    components: [T; CHANNELS],
}

impl<T: Copy> RGBPixel<T> {
    pub fn new(red: T, green: T, blue: T) -> Self {
        Self {
            components: [red, green, blue],
        }
    }

    pub fn red(&self) -> T {
        self.components[RED_INDEX]
    }

    pub fn green(&self) -> T {
        self.components[GREEN_INDEX]
    }

    pub fn blue(&self) -> T {
        self.components[BLUE_INDEX]
    }

    pub fn set_red(&mut self, red: T) {
        self.components[RED_INDEX] = red;
    }

    pub fn set_green(&mut self, green: T) {
        self.components[GREEN_INDEX] = green;
    }

    pub fn set_blue(&mut self, blue: T) {
        self.components[BLUE_INDEX] = blue;
    }

    /// Checked positional access. Anything outside `0..3` is rejected,
    /// negative indices included.
    pub fn component(&self, index: isize) -> crate::Result<T> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.components.get(i))
            .copied()
            .ok_or(Error::InvalidChannelIndex(index))
    }

    pub fn as_array(&self) -> &[T; CHANNELS] {
        &self.components
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        CHANNELS
    }
}

impl RGBPixel<u8> {
    /// Maps samples of range `0..=max_value` onto `0..=255`.
    pub fn from_range(max_value: u16, red: u16, green: u16, blue: u16) -> crate::Result<Self> {
        if max_value == 0 {
            return Err(Error::InvalidMaxValue(max_value as u32));
        }
        Ok(Self::new(
            scale_to_u8(red, max_value)?,
            scale_to_u8(green, max_value)?,
            scale_to_u8(blue, max_value)?,
        ))
    }
}

fn scale_to_u8(component: u16, max_value: u16) -> crate::Result<u8> {
    if component > max_value {
        return Err(Error::ComponentExceedsMaxValue(component, max_value));
    }
    if max_value == u8::MAX as u16 {
        return Ok(component as u8);
    }
    let max_value = max_value as u32;
    let scaled = (component as u32 * u8::MAX as u32 + max_value / 2) / max_value;
    Ok(scaled as u8)
}

impl<T> From<[T; CHANNELS]> for RGBPixel<T> {
    fn from(components: [T; CHANNELS]) -> Self {
        Self { components }
    }
}

impl<T> Index<usize> for RGBPixel<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.components[index]
    }
}

impl<T> IndexMut<usize> for RGBPixel<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.components[index]
    }
}

impl<T: Display> Display for RGBPixel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.components[RED_INDEX], self.components[GREEN_INDEX], self.components[BLUE_INDEX]
        )
    }
}
