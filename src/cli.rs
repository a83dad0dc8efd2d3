use std::process::ExitCode;

use log::error;

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

/// `Ok(true)` is 0, a reported failure (`Ok(false)`) is 1, and an unexpected
/// error is printed once here and also gives 1.
pub fn status_code(result: anyhow::Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            error!("{e:#}");
            1
        }
    }
}

pub fn exit_status(result: anyhow::Result<bool>) -> ExitCode {
    ExitCode::from(status_code(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(status_code(Ok(true)), 0);
        assert_eq!(status_code(Ok(false)), 1);
        assert_eq!(status_code(Err(anyhow::anyhow!("boom"))), 1);
    }
}
