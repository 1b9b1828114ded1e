//! Display module, manages the window and the cell-grid framebuffer

use log::{info, warn};
use minifb::{Key, Scale, ScaleMode, Window, WindowOptions};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

const WINDOW_TITLE: &str = "Maze collapse";

/// 32-bit ARGB, fully opaque
const fn argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

const INITIAL_COLOR: u32 = argb(0xFF, 0xFF, 0xFF);
const BACKGROUND_COLOR: u32 = argb(0xAA, 0x80, 0xAA);
const OUT_OF_RANGE_COLOR: u32 = argb(0xFF, 0x00, 0x00);

/// Cadence of the close-request polling loop
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Outcome of [`GridDisplay::wait_until_closed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The user requested the window to close
    ClosedByUser,
    /// The timeout elapsed without a close request
    TimedOut,
}

/// Window-backed display for a fixed grid of square cells.
///
/// Construction only records dimensions; the window and its framebuffer are
/// acquired by [`init`](GridDisplay::init) and released by
/// [`teardown`](GridDisplay::teardown). Drawing calls between those two points
/// operate on the framebuffer and become visible on the next
/// [`present`](GridDisplay::present).
pub struct GridDisplay {
    rows: usize,
    cols: usize,
    cell_size: usize,
    width: usize,  // cols * cell_size
    height: usize, // rows * cell_size
    scale: u32,
    window: Option<Window>,
    buffer: Vec<u32>,
}

impl GridDisplay {
    /// Creates a display for a `rows` x `cols` grid of `cell_size`-pixel
    /// cells. No resources are acquired and no validation is performed.
    pub fn new(rows: usize, cols: usize, cell_size: usize) -> Self {
        GridDisplay {
            rows,
            cols,
            cell_size,
            width: cols * cell_size,
            height: rows * cell_size,
            scale: 1,
            window: None,
            buffer: Vec::new(),
        }
    }

    pub fn from_config(config: &crate::config::DisplayConfig) -> Self {
        let mut display = Self::new(config.rows, config.cols, config.cell_size);
        display.scale = config.scale;
        display
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// Window width in pixels (`cols * cell_size`)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Window height in pixels (`rows * cell_size`)
    pub fn height(&self) -> usize {
        self.height
    }

    /// True between a successful `init` and `teardown`
    pub fn is_live(&self) -> bool {
        self.window.is_some()
    }

    /// Opens the window and allocates the framebuffer, filled opaque white.
    ///
    /// The scale factor is a best-effort hint: unsupported values are logged
    /// and the window falls back to 1:1. Fails if the window cannot be
    /// created; nothing is left acquired on failure.
    pub fn init(&mut self) -> Result<()> {
        if self.window.is_some() {
            return Err(Error::Subsystem("display already initialized".to_string()));
        }

        let options = WindowOptions {
            scale: scale_for(self.scale),
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        let window = Window::new(WINDOW_TITLE, self.width, self.height, options)?;

        self.buffer = vec![INITIAL_COLOR; self.width * self.height];
        self.window = Some(window);
        info!(
            "display opened: {}x{} cells, {} px/cell, window {}x{}",
            self.rows, self.cols, self.cell_size, self.width, self.height
        );
        Ok(())
    }

    /// Fills the whole surface with the background tint
    pub fn clear(&mut self) -> Result<()> {
        if !self.is_live() {
            return Err(Error::NotLive);
        }
        self.buffer.fill(BACKGROUND_COLOR);
        Ok(())
    }

    /// Pushes the framebuffer to the visible window
    pub fn present(&mut self) -> Result<()> {
        let window = self.window.as_mut().ok_or(Error::NotLive)?;
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }

    /// Fills one grid cell. The first parameter selects the row (pixel Y
    /// origin), the second the column (pixel X origin); the grid is addressed
    /// in row-major order.
    ///
    /// Intensity in the inclusive range `[0, 1]` maps to the greyscale level
    /// `255 * (1 - intensity)`, so 0 is white and 1 is black. Any value
    /// outside that range fills the cell pure red as a visible marker rather
    /// than being clamped. Cells beyond the grid are clipped.
    pub fn draw_cell(&mut self, row: usize, col: usize, intensity: f32) -> Result<()> {
        if !self.is_live() {
            return Err(Error::NotLive);
        }
        fill_rect(
            &mut self.buffer,
            self.width,
            col * self.cell_size,
            row * self.cell_size,
            self.cell_size,
            intensity_color(intensity),
        );
        Ok(())
    }

    /// Drains pending window events without blocking. Returns true and tears
    /// the display down if a close request (window closed or Escape) was
    /// delivered; otherwise returns false with no side effects.
    pub fn poll_close_requested(&mut self) -> Result<bool> {
        let window = self.window.as_mut().ok_or(Error::NotLive)?;
        window.update();
        let close = !window.is_open() || window.is_key_down(Key::Escape);
        if close {
            self.teardown()?;
        }
        Ok(close)
    }

    /// Polls for a close request every half second until one arrives or
    /// `timeout_secs` of wall-clock time elapse. The display is torn down on
    /// both paths before returning.
    pub fn wait_until_closed(&mut self, timeout_secs: u64) -> Result<WaitOutcome> {
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        while Instant::now() < deadline {
            if self.poll_close_requested()? {
                return Ok(WaitOutcome::ClosedByUser);
            }
            thread::sleep(POLL_INTERVAL);
        }
        self.teardown()?;
        Ok(WaitOutcome::TimedOut)
    }

    /// Releases the framebuffer, then the window. A second call is an
    /// [`Error::AlreadyClosed`] instead of undefined behavior.
    pub fn teardown(&mut self) -> Result<()> {
        if self.window.is_none() {
            return Err(Error::AlreadyClosed);
        }
        self.buffer = Vec::new();
        self.window = None;
        info!("display closed");
        Ok(())
    }
}

/// Maps an intensity to its fill color: greyscale inside `[0, 1]`, the red
/// out-of-range marker everywhere else (including NaN).
fn intensity_color(intensity: f32) -> u32 {
    if (0.0..=1.0).contains(&intensity) {
        let level = (255.0 * (1.0 - intensity)).round() as u8;
        argb(level, level, level)
    } else {
        OUT_OF_RANGE_COLOR
    }
}

/// Fills a `size` x `size` square at pixel position (`x0`, `y0`), clipped to
/// the surface bounds.
fn fill_rect(buffer: &mut [u32], width: usize, x0: usize, y0: usize, size: usize, color: u32) {
    if width == 0 {
        return;
    }
    let height = buffer.len() / width;
    for y in y0..(y0 + size).min(height) {
        let row = &mut buffer[y * width..(y + 1) * width];
        for pixel in &mut row[x0.min(width)..(x0 + size).min(width)] {
            *pixel = color;
        }
    }
}

fn scale_for(factor: u32) -> Scale {
    match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        16 => Scale::X16,
        32 => Scale::X32,
        other => {
            warn!("{}", Error::ScaleHint(other));
            Scale::X1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_endpoints() {
        assert_eq!(intensity_color(0.0), argb(0xFF, 0xFF, 0xFF));
        assert_eq!(intensity_color(1.0), argb(0x00, 0x00, 0x00));
    }

    #[test]
    fn test_intensity_rounds_grey_level() {
        // 255 * (1 - 0.5) = 127.5, rounds up
        assert_eq!(intensity_color(0.5), argb(0x80, 0x80, 0x80));
        // 255 * (1 - 0.25) = 191.25, rounds down
        assert_eq!(intensity_color(0.25), argb(0xBF, 0xBF, 0xBF));
    }

    #[test]
    fn test_out_of_range_intensity_is_red() {
        assert_eq!(intensity_color(-0.1), OUT_OF_RANGE_COLOR);
        assert_eq!(intensity_color(1.5), OUT_OF_RANGE_COLOR);
        assert_eq!(intensity_color(100.0), OUT_OF_RANGE_COLOR);
        assert_eq!(intensity_color(f32::NAN), OUT_OF_RANGE_COLOR);
    }

    #[test]
    fn test_window_dimensions_follow_grid() {
        let display = GridDisplay::new(10, 20, 8);
        assert_eq!(display.width(), 160);
        assert_eq!(display.height(), 80);
        assert_eq!(display.rows(), 10);
        assert_eq!(display.cols(), 20);
        assert_eq!(display.cell_size(), 8);
        assert!(!display.is_live());
    }

    #[test]
    fn test_fill_rect_positions_cell() {
        // 4x4 surface, 2x2 fill with its origin at column 1, row 1
        let mut buffer = vec![0u32; 16];
        fill_rect(&mut buffer, 4, 1, 1, 2, 7);
        let filled: Vec<usize> = (0..16).filter(|&i| buffer[i] == 7).collect();
        assert_eq!(filled, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_fill_rect_clips_at_edges() {
        let mut buffer = vec![0u32; 16];
        fill_rect(&mut buffer, 4, 3, 3, 2, 7);
        let filled: Vec<usize> = (0..16).filter(|&i| buffer[i] == 7).collect();
        assert_eq!(filled, vec![15]);

        let mut buffer = vec![0u32; 16];
        fill_rect(&mut buffer, 4, 10, 0, 2, 7);
        assert!(buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_row_maps_to_y_and_col_to_x() {
        // 2x3 grid of 2px cells -> 6x4 surface; cell (row 1, col 2) starts at
        // pixel x=4, y=2
        let mut buffer = vec![0u32; 24];
        fill_rect(&mut buffer, 6, 2 * 2, 1 * 2, 2, 7);
        let filled: Vec<usize> = (0..24).filter(|&i| buffer[i] == 7).collect();
        assert_eq!(filled, vec![16, 17, 22, 23]);
    }

    #[test]
    fn test_dead_handle_is_guarded() {
        let mut display = GridDisplay::new(4, 4, 4);
        assert!(matches!(display.clear(), Err(Error::NotLive)));
        assert!(matches!(display.present(), Err(Error::NotLive)));
        assert!(matches!(display.draw_cell(0, 0, 0.5), Err(Error::NotLive)));
        assert!(matches!(display.poll_close_requested(), Err(Error::NotLive)));
        assert!(matches!(display.teardown(), Err(Error::AlreadyClosed)));
    }

    #[test]
    fn test_unknown_scale_falls_back() {
        assert!(matches!(scale_for(3), Scale::X1));
        assert!(matches!(scale_for(2), Scale::X2));
        assert!(matches!(scale_for(0), Scale::X1));
    }
}
