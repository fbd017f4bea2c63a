//! Rendering surface derived from the terminal size.

/// Used when the terminal size cannot be read (e.g. output is piped)
pub const FALLBACK_SIZE: (usize, usize) = (120, 30);

/// Map surface as (width, height): all columns, one row kept free for the
/// shell prompt.
pub fn surface_size() -> (usize, usize) {
    match crossterm::terminal::size() {
        Ok((columns, rows)) if columns > 0 && rows > 1 => (columns as usize, rows as usize - 1),
        Ok((columns, rows)) => {
            log::warn!(
                "Terminal reports {}x{}, using {}x{}",
                columns,
                rows,
                FALLBACK_SIZE.0,
                FALLBACK_SIZE.1
            );
            FALLBACK_SIZE
        }
        Err(e) => {
            log::warn!(
                "Can't read terminal size ({}), using {}x{}",
                e,
                FALLBACK_SIZE.0,
                FALLBACK_SIZE.1
            );
            FALLBACK_SIZE
        }
    }
}
