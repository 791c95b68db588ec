use std::{
    fmt::Write as _,
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{DateTime, Local};
use concat_string::concat_string;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

const LOG_DIR: &str = "log";
const FLUSH_SIZE: usize = 4096;

/// 背景線程收到的指令
enum Command {
    Write(LogMessage),
    /// 寫出暫存的內容後回覆
    Flush(Sender<()>),
}

/// 以背景線程寫入 `log/<name>_<date>.log` 的日誌
pub struct Logger {
    writer: Sender<Command>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        let (tx, rx) = unbounded::<Command>();

        match Self::get_log_path(log_name) {
            Some(log_path) => {
                // 寫入檔案的操作使用另一個線程處理
                thread::spawn(move || write_file(log_path, rx));
            }
            None => {
                error_console(format!(
                    "Failed to create log directory for {}, logging to console",
                    log_name
                ));
                thread::spawn(move || write_console(rx));
            }
        }

        Logger { writer: tx }
    }

    pub fn info(&self, log: String) {
        self.send(log::Level::Info, log);
    }

    pub fn error(&self, log: String) {
        self.send(log::Level::Error, log);
    }

    /// Blocks until every line queued before this call has reached the file.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = bounded::<()>(1);
        if self.writer.send(Command::Flush(ack_tx)).is_err() {
            return;
        }

        if let Err(why) = ack_rx.recv() {
            error_console(format!("Log writer stopped before flushing: {}", why));
        }
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(Command::Write(LogMessage::new(level, msg))) {
            error_console(why.to_string());
        }
    }

    fn get_log_path(name: &str) -> Option<PathBuf> {
        let path = Path::new(LOG_DIR);

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(format!("{}_{}.log", name, Local::now().format("%Y-%m-%d")));

        Some(log_path)
    }
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }

    fn format_line(&self) -> String {
        concat_string!(
            self.created_at.format("%F %X%.6f").to_string(),
            " ",
            self.level.to_string(),
            " ",
            self.msg
        )
    }
}

fn write_file(log_path: PathBuf, rx: Receiver<Command>) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(why) => {
            error_console(format!(
                "Failed to open log file {} because {:?}",
                log_path.display(),
                why
            ));
            write_console(rx);
            return;
        }
    };

    let mut writer = BufWriter::new(file);
    let mut line = String::with_capacity(FLUSH_SIZE);

    while let Ok(command) = rx.recv() {
        match command {
            Command::Write(received) => {
                if writeln!(&mut line, "{}", received.format_line()).is_err() {
                    continue;
                }

                if rx.is_empty() || line.len() >= FLUSH_SIZE {
                    write_out(&mut writer, &mut line);
                }
            }
            Command::Flush(ack) => {
                write_out(&mut writer, &mut line);
                let _ = ack.send(());
            }
        }
    }

    write_out(&mut writer, &mut line);
}

fn write_out<W: Write>(writer: &mut W, line: &mut String) {
    if line.is_empty() {
        return;
    }

    if writer.write_all(line.as_bytes()).is_err() || writer.flush().is_err() {
        info_console(line.clone());
    }

    line.clear();
}

fn write_console(rx: Receiver<Command>) {
    while let Ok(command) = rx.recv() {
        match command {
            Command::Write(received) => println!("{}", received.format_line()),
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

/// 等待預設日誌寫完，尚未建立時不做任何事
pub fn flush() {
    if let Some(logger) = Lazy::get(&LOGGER) {
        logger.flush();
    }
}

pub fn info_console(log: String) {
    console(log::Level::Info, log);
}

pub fn error_console(log: String) {
    console(log::Level::Error, log);
}

fn console(level: log::Level, log: String) {
    println!(
        "{} {} {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        level,
        log
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let msg = LogMessage::new(log::Level::Error, "GET failed".to_string());
        let line = msg.format_line();
        assert!(line.ends_with(" ERROR GET failed"));
        assert!(line.starts_with(&msg.created_at.format("%F").to_string()));
    }

    #[test]
    fn test_flush_writes_pending_lines() {
        let name = "logging_unit_test";
        let logger = Logger::new(name);
        logger.info("hello from test".to_string());
        logger.error("boom".to_string());
        logger.flush();

        let path = Logger::get_log_path(name).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("INFO hello from test"));
        assert!(content.contains("ERROR boom"));
    }

    #[test]
    fn test_flush_with_nothing_queued() {
        let logger = Logger::new("logging_unit_test_idle");
        logger.flush();
        logger.flush();
    }

    #[test]
    fn test_console_writer_acks_flush() {
        let (tx, rx) = unbounded::<Command>();
        let handle = thread::spawn(move || write_console(rx));

        tx.send(Command::Write(LogMessage::new(
            log::Level::Info,
            "to console".to_string(),
        )))
        .unwrap();
        let (ack_tx, ack_rx) = bounded::<()>(1);
        tx.send(Command::Flush(ack_tx)).unwrap();
        ack_rx.recv().unwrap();

        drop(tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_write_out_clears_buffer() {
        let mut sink = Vec::new();
        let mut line = "a line\n".to_string();
        write_out(&mut sink, &mut line);
        assert!(line.is_empty());
        assert_eq!(sink, b"a line\n");

        write_out(&mut sink, &mut line);
        assert_eq!(sink, b"a line\n");
    }
}
