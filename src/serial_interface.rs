use core::cell::RefCell;
use core::fmt::{self, Write};

use cortex_m::interrupt::{self, Mutex};
use heapless::String;
use stm32f1xx_hal::pac::USART1;
use stm32f1xx_hal::serial::Tx;

const LOG_BUFFER_SIZE: usize = 256;

// `log` records are only buffered here; the main loop pushes them out, so no
// interrupt is ever blocked by a slow UART.
static LOG_BUFFER: Mutex<RefCell<String<LOG_BUFFER_SIZE>>> =
    Mutex::new(RefCell::new(String::new()));

struct BufferedLogger;

static LOGGER: BufferedLogger = BufferedLogger;

impl log::Log for BufferedLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            let mut buf = LOG_BUFFER.borrow(cs).borrow_mut();
            // full buffer: record dropped
            let _ = write!(buf, "[{}] {}\r\n", record.level(), record.args());
        });
    }

    fn flush(&self) {}
}

/// Text console on USART1 TX: diagnostic lines and `log` output.
pub struct SerialConsole {
    tx: Tx<USART1>,
}

impl SerialConsole {
    /// Installs the console as the `log` backend.
    pub fn init(tx: Tx<USART1>, level: log::LevelFilter) -> Self {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
        Self { tx }
    }

    /// Sends buffered log records, blocking.
    pub fn flush_logs(&mut self) {
        let pending = interrupt::free(|cs| core::mem::take(&mut *LOG_BUFFER.borrow(cs).borrow_mut()));
        if !pending.is_empty() {
            let _ = self.tx.write_str(&pending);
        }
    }
}

impl Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.tx.write_str(s)
    }
}
