use micro_head::connection::BufferConnection;
use micro_head::protocol::HeaderBlock;

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    kind: MessageKind,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, kind: MessageKind, file: TestFile) -> Self {
        Self { name, kind, file }
    }

    pub fn request(name: &'static str, file: TestFile) -> Self {
        Self::new(name, MessageKind::Request, file)
    }

    pub fn response(name: &'static str, file: TestFile) -> Self {
        Self::new(name, MessageKind::Response, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    /// A fresh connection serving the fixture.
    pub fn connection(&self) -> BufferConnection {
        BufferConnection::new(self.file.content())
    }

    /// The fixture decoded once, for encoder benchmarks.
    pub fn header_block(&self) -> HeaderBlock {
        HeaderBlock::read_from(&mut self.connection())
            .ok()
            .flatten()
            .unwrap_or_else(|| panic!("fixture {} should hold a valid header block", self.file.file_name()))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}
