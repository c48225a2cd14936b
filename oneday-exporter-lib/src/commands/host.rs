use std::io::Write;

/// Abstract the process environment so commands can run under test
pub trait Host: Send + Sync {
    // where the exposition and status lines go (e.g., stdout)
    fn output(&mut self) -> impl Write;

    // where failures are reported (e.g., stderr)
    fn error(&mut self) -> impl Write;

    /// Terminate the process (a test host only records the code).
    fn exit(&mut self, code: i32);
}

/// Host that captures output in memory and remembers the requested exit code
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_text(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
