use crate::{
    errors::ErrorKind,
    http::{
        headers::{HeaderMap, CRLF},
        types,
    },
    limits::{EofPolicy, ReqLimits},
};
use memchr::memmem;
use tokio::io::{AsyncRead, AsyncReadExt};

/// An HTTP/1.1 request, built up incrementally from raw bytes.
///
/// # Input data requirements
///
/// #### General designations
/// - `SP`: ASCII space (0x20)
/// - `CRLF`: Carriage return + line feed (`"\r\n"`) - **exactly this sequence required**
///
/// ## Request line
/// ```text
/// [METHOD] SP [TARGET] SP "HTTP/1.1" CRLF
/// ```
/// - `[METHOD]`: one or more upper-case ASCII letters. No method list is
///   enforced: `BREW` is as valid as `GET`.
/// - `[TARGET]`: any non-empty run of non-whitespace characters.
/// - The version must be exactly `HTTP/1.1`; there is no negotiation.
///
/// ## Header
/// ```text
/// [NAME] ":" [VALUE] CRLF
/// ```
/// - `[NAME]`: a token, see [`HeaderMap::parse`]. Case-insensitive.
/// - `[VALUE]`: UTF-8; surrounding whitespace is trimmed.
///
/// ## Body
///
/// Only `Content-Length` framing is understood. A missing or non-numeric
/// `Content-Length` means no body. Any byte past the declared length is a
/// [`ContentLengthMismatch`](ErrorKind::ContentLengthMismatch).
///
/// **Not supported**: `Transfer-Encoding: chunked` request bodies,
/// pipelining, keep-alive.
///
/// # Examples
/// ```
/// use craft_http::{ParseState, Request};
///
/// let mut req = Request::new();
/// let data = b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
///
/// // Bytes can arrive in any fragmentation.
/// let consumed = req.parse(&data[..10]).unwrap();
/// assert_eq!(consumed, 0);
///
/// let consumed = req.parse(data).unwrap();
/// assert_eq!(consumed, data.len());
/// assert_eq!(req.state(), ParseState::Done);
/// assert_eq!(req.request_line.target, "/echo");
/// assert_eq!(req.body, b"hello");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    state: ParseState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

/// Where the parser stands in the message.
///
/// ```text
/// Init --request line--> ParsingHeaders --empty line--> ParsingBody --Content-Length bytes--> Done
///                                              \                                               ^
///                                               \-------- no body (length missing or 0) -------/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    Init,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl Request {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub const fn state(&self) -> ParseState {
        self.state
    }

    #[inline(always)]
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    #[inline(always)]
    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    #[inline(always)]
    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared body length. Missing or unparsable means `0`.
    ///
    /// A leading `+` is accepted, a leading `-` makes the value unparsable.
    #[inline]
    pub fn content_length(&self) -> usize {
        self.headers
            .get("content-length")
            .map(|value| value.strip_prefix('+').unwrap_or(value))
            .and_then(|value| types::slice_to_usize(value.as_bytes()))
            .unwrap_or(0)
    }
}

// State machine
impl Request {
    /// Feeds `data` to the parser and returns how many bytes it consumed.
    ///
    /// `data` must start with the first byte not consumed by the previous
    /// call. Whatever is not consumed has to be passed again, followed by
    /// newly read bytes. The parser never looks at consumed bytes again.
    ///
    /// Once [`Done`](ParseState::Done), further calls consume nothing and
    /// change nothing.
    ///
    /// Errors are final: the request must be discarded.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ErrorKind> {
        let mut read = 0;

        loop {
            let current = &data[read..];
            if current.is_empty() {
                break;
            }

            let consumed = match self.state {
                ParseState::Init => self.parse_request_line(current)?,
                ParseState::ParsingHeaders => self.parse_headers(current)?,
                ParseState::ParsingBody => self.parse_body(current)?,
                ParseState::Done => 0,
            };

            if consumed == 0 {
                break;
            }

            read += consumed;
        }

        Ok(read)
    }

    #[inline]
    fn parse_request_line(&mut self, data: &[u8]) -> Result<usize, ErrorKind> {
        let Some(end) = memmem::find(data, CRLF) else {
            return Ok(0);
        };

        self.request_line = RequestLine::parse(&data[..end])?;
        self.state = ParseState::ParsingHeaders;

        Ok(end + CRLF.len())
    }

    #[inline]
    fn parse_headers(&mut self, data: &[u8]) -> Result<usize, ErrorKind> {
        let (consumed, done) = self.headers.parse(data)?;

        if done {
            self.state = match self.content_length() {
                0 => ParseState::Done,
                _ => ParseState::ParsingBody,
            };
        }

        Ok(consumed)
    }

    #[inline]
    fn parse_body(&mut self, data: &[u8]) -> Result<usize, ErrorKind> {
        let expected = self.content_length();

        self.body.extend_from_slice(data);

        if self.body.len() > expected {
            return Err(ErrorKind::ContentLengthMismatch);
        }
        if self.body.len() == expected {
            self.state = ParseState::Done;
        }

        Ok(data.len())
    }

    #[inline]
    fn finish_early(&mut self, policy: EofPolicy) -> Result<(), ErrorKind> {
        match (policy, self.state) {
            (_, ParseState::Done) => Ok(()),
            (EofPolicy::Lenient, ParseState::ParsingBody) => {
                self.state = ParseState::Done;
                Ok(())
            }
            _ => Err(ErrorKind::UnexpectedEof),
        }
    }
}

impl RequestLine {
    /// Parses a request line without its trailing `CRLF`.
    ///
    /// The method ends at the first space and the version starts after the
    /// last one, so a target containing a space is reported as an invalid
    /// target rather than as a malformed line.
    pub(crate) fn parse(line: &[u8]) -> Result<Self, ErrorKind> {
        let line = simdutf8::basic::from_utf8(line).map_err(|_| ErrorKind::InvalidRequestLine)?;

        let (method, rest) = line.split_once(' ').ok_or(ErrorKind::InvalidRequestLine)?;
        let (target, version) = rest.rsplit_once(' ').ok_or(ErrorKind::InvalidRequestLine)?;

        if target.is_empty() || target.chars().any(char::is_whitespace) {
            return Err(ErrorKind::InvalidRequestTarget);
        }
        if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ErrorKind::InvalidMethod);
        }
        if version != "HTTP/1.1" {
            return Err(ErrorKind::InvalidHttpVersion);
        }

        Ok(RequestLine {
            method: method.to_owned(),
            target: target.to_owned(),
            version: version.to_owned(),
        })
    }
}

//

/// Read buffer for one connection.
///
/// `buffer[..len]` holds bytes read from the transport that the parser has
/// not consumed yet. After each parse call the consumed prefix is dropped
/// and the remainder moved to the front.
#[derive(Debug)]
pub(crate) struct ParseBuffer {
    len: usize,
    buffer: Vec<u8>,
}

impl ParseBuffer {
    #[inline]
    pub(crate) fn new(limits: &ReqLimits) -> Self {
        ParseBuffer {
            len: 0,
            buffer: vec![0; limits.initial_buffer_size.max(1)],
        }
    }

    /// Reads once into the free tail, doubling the buffer first if it is full.
    /// Returns `0` at end of stream.
    #[inline]
    pub(crate) async fn fill<R>(&mut self, reader: &mut R) -> Result<usize, ErrorKind>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        if self.len >= self.buffer.len() {
            let doubled = self.buffer.len() * 2;
            self.buffer.resize(doubled, 0);
        }

        let n = reader.read(&mut self.buffer[self.len..]).await?;
        self.len += n;
        Ok(n)
    }

    #[inline(always)]
    pub(crate) fn unconsumed(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    #[inline]
    pub(crate) fn consume(&mut self, n: usize) {
        self.buffer.copy_within(n..self.len, 0);
        self.len -= n;
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

/// Reads one request from `reader`.
///
/// Reads as often as needed, however the transport splits the bytes, and
/// stops reading as soon as the request is complete. Parse errors stop the
/// loop immediately; the reader is not touched again.
///
/// # Examples
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use craft_http::{limits::ReqLimits, request_from_reader};
///
/// let mut wire: &[u8] = b"GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let req = request_from_reader(&mut wire, &ReqLimits::default()).await.unwrap();
///
/// assert_eq!(req.request_line.method, "GET");
/// assert_eq!(req.headers.get("host"), Some("localhost"));
/// # }
/// ```
pub async fn request_from_reader<R>(reader: &mut R, limits: &ReqLimits) -> Result<Request, ErrorKind>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buffer = ParseBuffer::new(limits);
    let mut request = Request::new();

    while !request.is_done() {
        if buffer.fill(reader).await? == 0 {
            request.finish_early(limits.eof_policy)?;
            break;
        }

        let consumed = request.parse(buffer.unconsumed())?;
        buffer.consume(consumed);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };
    use tokio::io::ReadBuf;

    /// Hands out at most `step` bytes per read.
    struct ChunkReader {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl ChunkReader {
        fn new<D: AsRef<[u8]>>(data: D, step: usize) -> Self {
            Self {
                data: data.as_ref().to_vec(),
                pos: 0,
                step,
            }
        }
    }

    impl AsyncRead for ChunkReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let end = (self.pos + self.step)
                .min(self.data.len())
                .min(self.pos + buf.remaining());
            buf.put_slice(&self.data[self.pos..end]);
            self.pos = end;
            Poll::Ready(Ok(()))
        }
    }

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _: &mut Context<'_>,
            _: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")))
        }
    }

    fn parse_whole(data: &[u8]) -> Result<Request, ErrorKind> {
        let mut req = Request::new();
        let consumed = req.parse(data)?;
        assert_eq!(consumed, data.len());
        Ok(req)
    }

    fn parse_split(data: &[u8], step: usize) -> Result<Request, ErrorKind> {
        let mut req = Request::new();
        let mut pending = Vec::new();

        for chunk in data.chunks(step) {
            pending.extend_from_slice(chunk);
            let consumed = req.parse(&pending)?;
            pending.drain(..consumed);
        }

        assert!(pending.is_empty(), "left over: {:?}", pending);
        Ok(req)
    }

    #[test]
    fn request_line() {
        #[rustfmt::skip]
        let cases = [
            ("GET /path HTTP/1.1",     Ok(("GET", "/path", "HTTP/1.1"))),
            ("GET / HTTP/1.1",         Ok(("GET", "/", "HTTP/1.1"))),
            ("BREW /pot HTTP/1.1",     Ok(("BREW", "/pot", "HTTP/1.1"))),
            ("OPTIONS * HTTP/1.1",     Ok(("OPTIONS", "*", "HTTP/1.1"))),
            ("get /path HTTP/1.1",     Err(ErrorKind::InvalidMethod)),
            ("GeT /path HTTP/1.1",     Err(ErrorKind::InvalidMethod)),
            ("G3T /path HTTP/1.1",     Err(ErrorKind::InvalidMethod)),
            (" /path HTTP/1.1",        Err(ErrorKind::InvalidMethod)),
            ("GET /path HTTP/1.0",     Err(ErrorKind::InvalidHttpVersion)),
            ("GET /path HTTP/2",       Err(ErrorKind::InvalidHttpVersion)),
            ("GET /path http/1.1",     Err(ErrorKind::InvalidHttpVersion)),
            ("GET /path HTTP/1.1 ",    Err(ErrorKind::InvalidRequestTarget)),
            ("GET /pa th HTTP/1.1",    Err(ErrorKind::InvalidRequestTarget)),
            ("GET /pa\tth HTTP/1.1",   Err(ErrorKind::InvalidRequestTarget)),
            ("GET  HTTP/1.1",          Err(ErrorKind::InvalidRequestTarget)),
            ("GET /path HTTP/1.1 extra", Err(ErrorKind::InvalidRequestTarget)),
            ("GET  /path HTTP/1.1",    Err(ErrorKind::InvalidRequestTarget)),
            ("GET /path",              Err(ErrorKind::InvalidRequestLine)),
            ("GET",                    Err(ErrorKind::InvalidRequestLine)),
            ("",                       Err(ErrorKind::InvalidRequestLine)),
        ];

        for (line, result) in cases {
            let parsed = RequestLine::parse(line.as_bytes());
            let expected = result.map(|(method, target, version)| RequestLine {
                method: method.to_owned(),
                target: target.to_owned(),
                version: version.to_owned(),
            });

            assert_eq!(parsed, expected, "{line:?}");
        }

        assert_eq!(
            RequestLine::parse(b"GET /\xff HTTP/1.1"),
            Err(ErrorKind::InvalidRequestLine)
        );
    }

    #[test]
    fn parse_valid_request() {
        #[rustfmt::skip]
        let cases = vec![
            (
                "GET / HTTP/1.1\r\nHost: localhost:42069\r\n\r\n",
                ("GET", "/", vec![("host", "localhost:42069")], ""),
            ),
            (
                "GET /coffee HTTP/1.1\r\n\r\n",
                ("GET", "/coffee", vec![], ""),
            ),
            (
                "POST /submit HTTP/1.1\r\nHost: localhost\r\nContent-Length: 13\r\n\r\nhello world!\n",
                ("POST", "/submit", vec![("host", "localhost"), ("content-length", "13")], "hello world!\n"),
            ),
            (
                "PUT /x HTTP/1.1\r\nContent-Length: 0\r\n\r\n",
                ("PUT", "/x", vec![("content-length", "0")], ""),
            ),
            (
                "PUT /x HTTP/1.1\r\nContent-Length: lots\r\n\r\n",
                ("PUT", "/x", vec![("content-length", "lots")], ""),
            ),
            (
                "GET / HTTP/1.1\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\nAccept: text/html\r\n\r\n",
                ("GET", "/", vec![("user-agent", "curl/7.81.0"), ("accept", "*/*,text/html")], ""),
            ),
        ];

        for (data, (method, target, headers, body)) in cases {
            let req = parse_whole(data.as_bytes()).unwrap();

            assert_eq!(req.state(), ParseState::Done, "{data:?}");
            assert_eq!(req.request_line.method, method);
            assert_eq!(req.request_line.target, target);
            assert_eq!(req.request_line.version, "HTTP/1.1");
            assert_eq!(req.headers.iter().collect::<Vec<_>>(), headers);
            assert_eq!(req.body, body.as_bytes());
        }
    }

    #[test]
    fn parse_invalid_request() {
        #[rustfmt::skip]
        let cases = [
            ("GET /path HTTP/1.0\r\n\r\n",                             ErrorKind::InvalidHttpVersion),
            ("get /path HTTP/1.1\r\n\r\n",                             ErrorKind::InvalidMethod),
            ("GET /pa th HTTP/1.1\r\n\r\n",                            ErrorKind::InvalidRequestTarget),
            ("/coffee HTTP/1.1\r\n\r\n",                               ErrorKind::InvalidRequestLine),
            ("GET / HTTP/1.1\r\n  Host : x\r\n\r\n",                   ErrorKind::InvalidFieldName),
            ("GET / HTTP/1.1\r\nHost x\r\n\r\n",                       ErrorKind::InvalidFieldLine),
            ("POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello!",     ErrorKind::ContentLengthMismatch),
        ];

        for (data, err) in cases {
            let mut req = Request::new();
            assert_eq!(req.parse(data.as_bytes()), Err(err), "{data:?}");
        }
    }

    #[test]
    fn content_length() {
        let head = "POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\n";

        let req = parse_whole(format!("{head}hello").as_bytes()).unwrap();
        assert_eq!(req.state(), ParseState::Done);
        assert_eq!(req.body, b"hello");
        assert_eq!(req.content_length(), 5);

        let mut req = Request::new();
        assert_eq!(
            req.parse(format!("{head}hello!").as_bytes()),
            Err(ErrorKind::ContentLengthMismatch)
        );

        // Short body: everything consumed, still waiting.
        let mut req = Request::new();
        let data = format!("{head}hel");
        assert_eq!(req.parse(data.as_bytes()), Ok(data.len()));
        assert_eq!(req.state(), ParseState::ParsingBody);
        assert_eq!(req.body, b"hel");

        // The overflow may also arrive in a later fragment.
        assert_eq!(req.parse(b"lo!"), Err(ErrorKind::ContentLengthMismatch));
    }

    #[test]
    fn signed_content_length() {
        let req = parse_whole(b"POST / HTTP/1.1\r\nContent-Length: +3\r\n\r\nabc").unwrap();
        assert_eq!(req.state(), ParseState::Done);
        assert_eq!(req.content_length(), 3);
        assert_eq!(req.body, b"abc");

        #[rustfmt::skip]
        let cases = [
            ("-3",  0),
            ("++3", 0),
            ("+",   0),
            (" 3 ", 3),
        ];

        for (value, len) in cases {
            let mut req = Request::new();
            let head = format!("POST / HTTP/1.1\r\nContent-Length: {value}\r\n\r\n");
            req.parse(head.as_bytes()).unwrap();
            assert_eq!(req.content_length(), len, "{value:?}");
        }
    }

    #[test]
    fn partial_input() {
        let mut req = Request::new();

        assert_eq!(req.parse(b"GET / HT"), Ok(0));
        assert_eq!(req.state(), ParseState::Init);

        assert_eq!(req.parse(b"GET / HTTP/1.1\r\nHo"), Ok(16));
        assert_eq!(req.state(), ParseState::ParsingHeaders);

        assert_eq!(req.parse(b"Ho"), Ok(0));
        assert_eq!(req.parse(b"Host: a\r\n"), Ok(9));
        assert_eq!(req.state(), ParseState::ParsingHeaders);

        assert_eq!(req.parse(b"\r"), Ok(0));
        assert_eq!(req.parse(b"\r\n"), Ok(2));
        assert_eq!(req.state(), ParseState::Done);
        assert_eq!(req.headers.get("host"), Some("a"));
    }

    #[test]
    fn parse_after_done_is_noop() {
        let data = b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let mut req = parse_whole(data).unwrap();
        let snapshot = req.clone();

        assert_eq!(req.parse(b"GET /again HTTP/1.1\r\n\r\n"), Ok(0));
        assert_eq!(req.parse(b""), Ok(0));
        assert_eq!(req, snapshot);
    }

    #[test]
    fn fragmentation_does_not_matter() {
        #[rustfmt::skip]
        let cases = [
            "GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n",
            "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n",
            "PATCH /a HTTP/1.1\r\nX: 1\r\nX: 2\r\nContent-Length: 1\r\n\r\nz",
        ];

        for data in cases {
            let whole = parse_whole(data.as_bytes()).unwrap();

            for step in 1..=data.len() {
                let split = parse_split(data.as_bytes(), step).unwrap();
                assert_eq!(split, whole, "step {step} of {data:?}");
            }
        }
    }

    #[test]
    fn invalid_field_name_in_any_fragmentation() {
        let data = "GET / HTTP/1.1\r\nHÂ©st: localhost:42069\r\n\r\n".as_bytes();

        for step in 1..=data.len() {
            assert_eq!(
                parse_split(data, step),
                Err(ErrorKind::InvalidFieldName),
                "step {step}"
            );
        }
    }

    #[tokio::test]
    async fn reader_any_step() {
        let data = "POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";
        let limits = ReqLimits::default();

        for step in 1..=data.len() {
            let mut reader = ChunkReader::new(data, step);
            let req = request_from_reader(&mut reader, &limits).await.unwrap();

            assert_eq!(req.request_line.method, "POST");
            assert_eq!(req.request_line.target, "/submit");
            assert_eq!(req.headers.get("host"), Some("localhost:42069"));
            assert_eq!(req.body, b"hello world!\n");
        }
    }

    #[tokio::test]
    async fn reader_stops_after_done() {
        // Nothing after the empty line is read: the next request line would
        // otherwise be a body without a Content-Length.
        let mut reader = ChunkReader::new("GET / HTTP/1.1\r\n\r\nGET /next HTTP/1.1\r\n\r\n", 18);
        let req = request_from_reader(&mut reader, &ReqLimits::default())
            .await
            .unwrap();

        assert_eq!(req.request_line.target, "/");
        assert_eq!(reader.pos, 18);
    }

    #[tokio::test]
    async fn reader_grows_buffer() {
        let long_value = "v".repeat(10_000);
        let data = format!("GET / HTTP/1.1\r\nX-Long: {long_value}\r\n\r\n");
        let limits = ReqLimits {
            initial_buffer_size: 8,
            ..ReqLimits::default()
        };

        let mut reader = ChunkReader::new(&data, 3);
        let req = request_from_reader(&mut reader, &limits).await.unwrap();
        assert_eq!(req.headers.get("x-long"), Some(long_value.as_str()));

        let mut reader = ChunkReader::new(&data, data.len());
        let mut buffer = ParseBuffer::new(&limits);
        while buffer.unconsumed().len() < data.len() {
            buffer.fill(&mut reader).await.unwrap();
        }
        assert!(buffer.capacity() >= data.len());
        assert!(buffer.capacity().is_power_of_two());
    }

    #[test]
    fn buffer_compaction() {
        let mut buffer = ParseBuffer::new(&ReqLimits::default());
        buffer.buffer[..5].copy_from_slice(b"abcde");
        buffer.len = 5;

        buffer.consume(2);
        assert_eq!(buffer.unconsumed(), b"cde");

        buffer.consume(3);
        assert_eq!(buffer.unconsumed(), b"");
    }

    #[tokio::test]
    async fn reader_eof() {
        #[rustfmt::skip]
        let cases = [
            ("",                                                 EofPolicy::Strict,  Err(ErrorKind::UnexpectedEof)),
            ("GET / HTTP/1.1\r\n",                               EofPolicy::Strict,  Err(ErrorKind::UnexpectedEof)),
            ("GET / HTTP/1.1\r\nHost: a\r\n",                    EofPolicy::Lenient, Err(ErrorKind::UnexpectedEof)),
            ("POST / HTTP/1.1\r\nContent-Length: 9\r\n\r\nabc",  EofPolicy::Strict,  Err(ErrorKind::UnexpectedEof)),
            ("POST / HTTP/1.1\r\nContent-Length: 9\r\n\r\nabc",  EofPolicy::Lenient, Ok(&b"abc"[..])),
            ("POST / HTTP/1.1\r\nContent-Length: 9\r\n\r\n",     EofPolicy::Lenient, Ok(&b""[..])),
        ];

        for (data, eof_policy, result) in cases {
            let limits = ReqLimits {
                eof_policy,
                ..ReqLimits::default()
            };
            let mut reader = ChunkReader::new(data, 4);

            let parsed = request_from_reader(&mut reader, &limits).await;
            assert_eq!(parsed.map(|req| req.body), result.map(<[u8]>::to_vec), "{data:?}");
        }
    }

    #[tokio::test]
    async fn reader_errors() {
        let mut reader = ChunkReader::new("GET /path HTTP/1.0\r\nHost: a\r\n\r\n", 64);
        assert_eq!(
            request_from_reader(&mut reader, &ReqLimits::default()).await,
            Err(ErrorKind::InvalidHttpVersion)
        );

        let err = request_from_reader(&mut FailingReader, &ReqLimits::default())
            .await
            .unwrap_err();
        assert!(!err.is_protocol());
    }
}
