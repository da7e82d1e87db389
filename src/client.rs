use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Read, Write};

use bufstream::BufStream;

use crate::error::{Error, ParseError, Result, ValidateError};
use crate::parse::{literal_length, parse_completion, parse_untagged, Status, Untagged};
use crate::session::Session;
use crate::types::{Capabilities, Fetch, Flag, MessageId, Seq, StoreMode, ThreadNode};
use crate::utils::{iter_join, sequence_set};

static TAG_PREFIX: &str = "a";
const INITIAL_TAG: u32 = 0;
const CR: u8 = 0x0d;
const LF: u8 = 0x0a;

macro_rules! quote {
    ($x:expr) => {
        format!("\"{}\"", $x.replace(r"\", r"\\").replace("\"", "\\\""))
    };
}

fn validate_str(value: &str) -> Result<String> {
    let quoted = quote!(value);
    if quoted.contains('\n') {
        return Err(Error::Validate(ValidateError('\n')));
    }
    if quoted.contains('\r') {
        return Err(Error::Validate(ValidateError('\r')));
    }
    Ok(quoted)
}

/// A connection to an IMAP server, speaking the commands a [`MessageList`](crate::MessageList)
/// needs.
///
/// The caller opens the stream (plain TCP, TLS, ...) and hands it over; the client only frames
/// commands and reads responses. Commands are strictly sequential: each method returns once the
/// tagged completion for its command has been read.
///
/// Besides answering commands, the client keeps the latest flags and sequence number of every
/// message it hears about, solicited or not, and remembers EXPUNGE notifications until
/// [`reset_expunged`](Session::reset_expunged).
#[derive(Debug)]
pub struct Client<T: Read + Write> {
    stream: BufStream<T>,
    tag: u32,
    uids: bool,
    capabilities: Option<Capabilities>,
    exists: u32,
    cache: HashMap<MessageId, Fetch>,
    expunged: Vec<Seq>,
}

impl<T: Read + Write> Client<T> {
    /// Creates a new client that addresses messages by sequence number.
    pub fn new(stream: T) -> Client<T> {
        Client::with_mode(stream, false)
    }

    /// Creates a new client that addresses messages by UID, sending `UID SEARCH`, `UID FETCH` and
    /// so on.
    pub fn with_uids(stream: T) -> Client<T> {
        Client::with_mode(stream, true)
    }

    fn with_mode(stream: T, uids: bool) -> Client<T> {
        Client {
            stream: BufStream::new(stream),
            tag: INITIAL_TAG,
            uids,
            capabilities: None,
            exists: 0,
            cache: HashMap::new(),
            expunged: Vec::new(),
        }
    }

    /// Whether message identifiers are UIDs rather than sequence numbers.
    pub fn uses_uids(&self) -> bool {
        self.uids
    }

    /// The underlying stream.
    pub fn get_ref(&self) -> &T {
        self.stream.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.stream.get_mut()
    }

    /// Read the server greeting. Call this once, right after connecting.
    pub fn read_greeting(&mut self) -> Result<()> {
        let mut v = Vec::new();
        self.read_response_line(&mut v)?;
        if v.len() >= 5 && v[..5].eq_ignore_ascii_case(b"* BYE") {
            return Err(Error::No(
                String::from_utf8_lossy(&v[5..]).trim().to_string(),
            ));
        }
        Ok(())
    }

    /// Log in with a plain username and password.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let u = validate_str(username)?;
        let p = validate_str(password)?;
        self.run_command_and_check_ok(&format!("LOGIN {} {}", u, p))?;
        // servers commonly advertise more once authenticated
        self.capabilities = None;
        Ok(())
    }

    /// Selects a mailbox and returns how many messages it holds.
    ///
    /// Everything remembered about the previously selected mailbox is dropped.
    pub fn select(&mut self, mailbox_name: &str) -> Result<u32> {
        let name = validate_str(mailbox_name)?;
        self.cache.clear();
        self.expunged.clear();
        self.exists = 0;
        self.run_command_and_check_ok(&format!("SELECT {}", name))?;
        Ok(self.exists)
    }

    /// The message count of the selected mailbox as last reported by the server.
    pub fn exists(&self) -> u32 {
        self.exists
    }

    /// Log out.
    pub fn logout(&mut self) -> Result<()> {
        self.run_command_and_check_ok("LOGOUT")
    }

    /// The server's capabilities. Asked once, then remembered until
    /// [`invalidate_capabilities`](Client::invalidate_capabilities) or the next login.
    pub fn capabilities(&mut self) -> Result<&Capabilities> {
        if self.capabilities.is_none() {
            let mut caps = Capabilities::default();
            for response in self.run("CAPABILITY")? {
                if let Untagged::Capabilities(c) = response {
                    caps.extend(c.iter());
                }
            }
            log::debug!("server capabilities: {:?}", caps);
            self.capabilities = Some(caps);
        }
        Ok(self.capabilities.get_or_insert_with(Capabilities::default))
    }

    /// Forget the remembered capabilities, e.g. after reconnecting.
    pub fn invalidate_capabilities(&mut self) {
        self.capabilities = None;
    }

    /// Runs a command and checks that it completed with OK.
    pub fn run_command_and_check_ok(&mut self, command: &str) -> Result<()> {
        self.run(command).map(|_| ())
    }

    fn prefix(&self) -> &'static str {
        if self.uids {
            "UID "
        } else {
            ""
        }
    }

    fn run(&mut self, untagged_command: &str) -> Result<Vec<Untagged>> {
        let command = self.create_command(untagged_command);
        self.write_line(command.as_bytes())?;
        self.read_responses()
    }

    fn read_responses(&mut self) -> Result<Vec<Untagged>> {
        let match_tag = format!("{}{}", TAG_PREFIX, self.tag);
        let mut responses = Vec::new();
        loop {
            let mut response = Vec::new();
            self.read_response_line(&mut response)?;

            if let Some(done) = parse_completion(&response) {
                if done.tag != match_tag.as_bytes() {
                    return Err(Error::Parse(ParseError::UnexpectedTag(
                        String::from_utf8_lossy(done.tag).into_owned(),
                    )));
                }
                let information = String::from_utf8_lossy(done.information).into_owned();
                return match done.status {
                    Status::Ok => Ok(responses),
                    Status::No => Err(Error::No(information)),
                    Status::Bad => Err(Error::Bad(information)),
                };
            }
            if response.starts_with(b"+") {
                // we never send literals, so nothing should be waiting for one
                return Err(Error::Parse(ParseError::Invalid(response)));
            }

            match parse_untagged(&response)? {
                Untagged::Exists(n) => self.exists = n,
                Untagged::Expunge(seq) => {
                    self.note_expunge(seq);
                    responses.push(Untagged::Expunge(seq));
                }
                Untagged::Fetch(fetch) => {
                    self.absorb(&fetch);
                    responses.push(Untagged::Fetch(fetch));
                }
                Untagged::Other => {}
                other => responses.push(other),
            }
        }
    }

    fn cache_key(&self, fetch: &Fetch) -> Option<MessageId> {
        if !self.uids {
            return Some(fetch.message);
        }
        fetch.uid.or_else(|| {
            self.cache
                .iter()
                .find(|(_, cached)| cached.message == fetch.message)
                .map(|(uid, _)| *uid)
        })
    }

    fn absorb(&mut self, fetch: &Fetch) {
        if let Some(key) = self.cache_key(fetch) {
            self.cache
                .entry(key)
                .or_insert_with(|| Fetch::new(fetch.message))
                .merge(fetch.flag_state());
        }
    }

    fn note_expunge(&mut self, seq: Seq) {
        log::debug!("message {} expunged", seq);
        self.expunged.push(seq);
        self.exists = self.exists.saturating_sub(1);
        if self.uids {
            self.cache.retain(|_, cached| cached.message != seq);
            for cached in self.cache.values_mut() {
                if cached.message > seq {
                    cached.message -= 1;
                }
            }
        } else {
            // every later sequence number just shifted
            self.cache.clear();
        }
    }

    /// Read one complete response, literals included.
    fn read_response_line(&mut self, into: &mut Vec<u8>) -> Result<()> {
        loop {
            let start = into.len();
            self.readline(into)?;
            match literal_length(&into[start..]) {
                Some(len) => {
                    let at = into.len();
                    into.resize(at + len, 0);
                    self.stream.read_exact(&mut into[at..])?;
                    log::trace!("S: <{} octets>", len);
                }
                None => return Ok(()),
            }
        }
    }

    fn readline(&mut self, into: &mut Vec<u8>) -> Result<usize> {
        let read = self.stream.read_until(LF, into)?;
        if read == 0 {
            return Err(Error::ConnectionLost);
        }
        let line = &into[into.len() - read..];
        log::trace!("S: {}", String::from_utf8_lossy(line).trim_end());
        Ok(read)
    }

    fn create_command(&mut self, command: &str) -> String {
        self.tag += 1;
        format!("{}{} {}", TAG_PREFIX, self.tag, command)
    }

    fn write_line(&mut self, buf: &[u8]) -> Result<()> {
        self.stream.write_all(buf)?;
        self.stream.write_all(&[CR, LF])?;
        self.stream.flush()?;
        log::trace!("C: {}", String::from_utf8_lossy(buf));
        Ok(())
    }
}

fn collect_ids(responses: Vec<Untagged>) -> Vec<MessageId> {
    responses
        .into_iter()
        .flat_map(|r| match r {
            Untagged::Ids(ids) => ids,
            _ => Vec::new(),
        })
        .collect()
}

impl<T: Read + Write> Session for Client<T> {
    fn has_capability(&mut self, name: &str) -> Result<bool> {
        Ok(self.capabilities()?.has(name))
    }

    fn search(&mut self, query: &str) -> Result<Vec<MessageId>> {
        let command = format!("{}SEARCH {}", self.prefix(), query);
        Ok(collect_ids(self.run(&command)?))
    }

    fn sort(&mut self, criteria: &str, charset: &str, query: &str) -> Result<Vec<MessageId>> {
        let command = format!("{}SORT {} {} {}", self.prefix(), criteria, charset, query);
        Ok(collect_ids(self.run(&command)?))
    }

    fn thread(&mut self, algorithm: &str, charset: &str, query: &str) -> Result<Vec<ThreadNode>> {
        let command = format!("{}THREAD {} {} {}", self.prefix(), algorithm, charset, query);
        Ok(self
            .run(&command)?
            .into_iter()
            .flat_map(|r| match r {
                Untagged::Thread(threads) => threads,
                _ => Vec::new(),
            })
            .collect())
    }

    fn fetch(&mut self, ids: &[MessageId], query: &str) -> Result<HashMap<MessageId, Fetch>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let command = format!("{}FETCH {} {}", self.prefix(), sequence_set(ids), query);
        let wanted: HashSet<MessageId> = ids.iter().copied().collect();
        let mut found: HashMap<MessageId, Fetch> = HashMap::new();
        for response in self.run(&command)? {
            if let Untagged::Fetch(fetch) = response {
                let id = if self.uids { fetch.uid } else { Some(fetch.message) };
                match id {
                    Some(id) if wanted.contains(&id) => found
                        .entry(id)
                        .or_insert_with(|| Fetch::new(fetch.message))
                        .merge(fetch),
                    _ => {}
                }
            }
        }
        Ok(found)
    }

    fn store(&mut self, id: MessageId, mode: StoreMode, flags: &[Flag]) -> Result<()> {
        // only what the server reports back afterwards counts
        if let Some(cached) = self.cache.get_mut(&id) {
            cached.forget_flags();
        }
        let command = format!(
            "{}STORE {} {} ({})",
            self.prefix(),
            id,
            mode,
            iter_join(flags, " ")
        );
        self.run_command_and_check_ok(&command)
    }

    fn last_fetch(&self, id: MessageId) -> Option<&Fetch> {
        self.cache.get(&id)
    }

    fn seq_of(&self, id: MessageId) -> Option<Seq> {
        if self.uids {
            self.cache.get(&id).map(|f| f.message)
        } else {
            Some(id)
        }
    }

    fn expunged(&self) -> &[Seq] {
        &self.expunged
    }

    fn reset_expunged(&mut self) {
        self.expunged.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::super::mock_stream::MockStream;
    use super::*;

    fn client(replies: &[&[u8]]) -> Client<MockStream> {
        let stream = replies.iter().fold(MockStream::new(), |s, r| s.reply(r));
        Client::new(stream)
    }

    fn uid_client(replies: &[&[u8]]) -> Client<MockStream> {
        let stream = replies.iter().fold(MockStream::new(), |s, r| s.reply(r));
        Client::with_uids(stream)
    }

    fn commands(client: &Client<MockStream>) -> &[String] {
        client.get_ref().commands()
    }

    #[test]
    fn read_greeting() {
        let mut client = Client::new(MockStream::new().greeting(b"* OK Dovecot ready.\r\n"));
        client.read_greeting().unwrap();
    }

    #[test]
    fn read_greeting_bye() {
        let mut client = Client::new(MockStream::new().greeting(b"* BYE Too many connections\r\n"));
        match client.read_greeting() {
            Err(Error::No(text)) => assert_eq!(text, "Too many connections"),
            r => panic!("expected the BYE text, got {:?}", r),
        }
    }

    #[test]
    fn tags_count_up_per_command() {
        let mut client = client(&[b"a1 OK NOOP completed\r\n", b"a2 OK NOOP completed\r\n"]);
        client.run_command_and_check_ok("NOOP").unwrap();
        client.run_command_and_check_ok("NOOP").unwrap();
        assert_eq!(commands(&client), ["a1 NOOP", "a2 NOOP"]);
    }

    #[test]
    fn literal_arriving_byte_by_byte() {
        let stream = MockStream::new()
            .reply(b"* 3 FETCH (BODY[HEADER] {9}\r\nSubject:\n)\r\na1 OK FETCH completed\r\n")
            .trickle(40);
        let mut client = Client::new(stream);
        let mut fetched = client.fetch(&[3], "BODY.PEEK[HEADER]").unwrap();
        assert_eq!(fetched.remove(&3).unwrap().section(), Some(&b"Subject:\n"[..]));
    }

    #[test]
    fn closed_connection_mid_response() {
        let mut client = uid_client(&[b"* SEARCH 4 5\r\n"]);
        match client.search("ALL") {
            Err(Error::ConnectionLost) => {}
            r => panic!("expected a lost connection, got {:?}", r),
        }
    }

    #[test]
    fn read_errors_surface_as_io() {
        let stream = MockStream::new().failing(ErrorKind::ConnectionReset);
        let mut client = Client::new(stream);
        match client.logout() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), ErrorKind::ConnectionReset),
            r => panic!("expected an io error, got {:?}", r),
        }
        assert_eq!(commands(&client), ["a1 LOGOUT"]);
    }

    #[test]
    fn login() {
        let mut client = client(&[b"a1 OK Logged in\r\n"]);
        client.login("username", "password").unwrap();
        assert_eq!(commands(&client), ["a1 LOGIN \"username\" \"password\""]);
    }

    #[test]
    fn login_escapes_quotes_and_backslashes() {
        let mut client = client(&[b"a1 OK Logged in\r\n"]);
        client.login("dom\\user", "pa\"ss").unwrap();
        assert_eq!(
            commands(&client),
            ["a1 LOGIN \"dom\\\\user\" \"pa\\\"ss\""]
        );
    }

    #[test]
    fn login_rejected() {
        let mut client = client(&[b"a1 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n"]);
        match client.login("username", "wrong") {
            Err(Error::No(text)) => {
                assert_eq!(text, "[AUTHENTICATIONFAILED] Invalid credentials")
            }
            r => panic!("expected a NO response, got {:?}", r),
        }
    }

    #[test]
    fn line_breaks_in_arguments_are_refused() {
        let mut client = client(&[]);
        match client.login("user\nname", "password") {
            Err(Error::Validate(ValidateError('\n'))) => {}
            r => panic!("expected a validation error, got {:?}", r),
        }
        match client.select("IN\rBOX") {
            Err(Error::Validate(ValidateError('\r'))) => {}
            r => panic!("expected a validation error, got {:?}", r),
        }
        assert!(commands(&client).is_empty());
    }

    #[test]
    fn logout() {
        let mut client = client(&[b"* BYE Logging out\r\na1 OK Logout completed.\r\n"]);
        client.logout().unwrap();
        assert_eq!(commands(&client), ["a1 LOGOUT"]);
    }

    #[test]
    fn select() {
        let response = b"* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
            * OK [PERMANENTFLAGS (\\* \\Answered \\Flagged \\Deleted \\Draft \\Seen)] Read-only mailbox.\r\n\
            * 1 EXISTS\r\n\
            * 1 RECENT\r\n\
            * OK [UNSEEN 1] First unseen.\r\n\
            * OK [UIDVALIDITY 1257842737] UIDs valid\r\n\
            * OK [UIDNEXT 2] Predicted next UID\r\n\
            a1 OK [READ-ONLY] Select completed.\r\n";
        let mut client = client(&[response]);
        assert_eq!(client.select("INBOX").unwrap(), 1);
        assert_eq!(commands(&client), ["a1 SELECT \"INBOX\""]);
    }

    #[test]
    fn unexpected_tag() {
        let mut client = client(&[b"a7 OK done\r\n"]);
        match client.logout() {
            Err(Error::Parse(ParseError::UnexpectedTag(tag))) => assert_eq!(tag, "a7"),
            r => panic!("expected an unexpected tag error, got {:?}", r),
        }
    }

    #[test]
    fn capability_is_asked_once() {
        let mut client = client(&[
            b"* CAPABILITY IMAP4rev1 SORT THREAD=REFERENCES\r\na1 OK CAPABILITY completed\r\n",
        ]);
        assert!(client.has_capability("SORT").unwrap());
        assert!(client.has_capability("thread=references").unwrap());
        assert!(!client.has_capability("THREAD=ORDEREDSUBJECT").unwrap());
        assert_eq!(client.capabilities().unwrap().len(), 3);
        assert_eq!(commands(&client), ["a1 CAPABILITY"]);
    }

    #[test]
    fn uid_search() {
        let mut client = uid_client(&[b"* SEARCH 2 84 882\r\na1 OK SEARCH completed\r\n"]);
        assert_eq!(client.search("UNSEEN").unwrap(), vec![2, 84, 882]);
        assert_eq!(commands(&client), ["a1 UID SEARCH UNSEEN"]);
    }

    #[test]
    fn sort() {
        let mut client = client(&[b"* SORT 5 3 4 1 2\r\na1 OK SORT completed\r\n"]);
        assert_eq!(
            client.sort("(REVERSE DATE FROM)", "UTF-8", "ALL").unwrap(),
            vec![5, 3, 4, 1, 2]
        );
        assert_eq!(commands(&client), ["a1 SORT (REVERSE DATE FROM) UTF-8 ALL"]);
    }

    #[test]
    fn thread() {
        let mut client = uid_client(&[
            b"* THREAD (166)(167)(168)(169)(172)(170)(171)(173)(174 (175)(176))\r\na1 OK THREAD completed\r\n",
        ]);
        let threads = client.thread("REFERENCES", "US-ASCII", "ALL").unwrap();
        assert_eq!(threads.len(), 9);
        assert_eq!(
            crate::thread::flatten(&threads),
            vec![166, 167, 168, 169, 172, 170, 171, 173, 174, 175, 176]
        );
        assert_eq!(commands(&client), ["a1 UID THREAD REFERENCES US-ASCII ALL"]);
    }

    #[test]
    fn sort_rejected() {
        let mut client = client(&[b"a1 BAD Unknown command\r\n"]);
        match client.sort("(DATE)", "UTF-8", "ALL") {
            Err(Error::Bad(text)) => assert_eq!(text, "Unknown command"),
            r => panic!("expected a BAD response, got {:?}", r),
        }
    }

    #[test]
    fn fetch_body() {
        let mut client = client(&[b"* 2 FETCH (BODY[TEXT] {3}\r\nfoo)\r\na1 OK FETCH completed\r\n"]);
        let mut fetched = client.fetch(&[2], "BODY[TEXT]").unwrap();
        assert_eq!(fetched.remove(&2).unwrap().section(), Some(&b"foo"[..]));
        assert_eq!(commands(&client), ["a1 FETCH 2 BODY[TEXT]"]);
    }

    #[test]
    fn bodies_are_not_remembered() {
        let mut client = uid_client(&[
            b"* 4 FETCH (UID 7 FLAGS (\\Seen) BODY[] {11}\r\nHello world)\r\na1 OK FETCH completed\r\n",
        ]);
        let fetched = client.fetch(&[7], "(FLAGS BODY.PEEK[])").unwrap();
        assert_eq!(fetched[&7].section(), Some(&b"Hello world"[..]));

        let remembered = client.last_fetch(7).unwrap();
        assert_eq!(remembered.message, 4);
        assert_eq!(remembered.flags(), Some(&[Flag::Seen][..]));
        assert_eq!(remembered.section(), None);
    }

    #[test]
    fn uid_fetch_skips_missing_and_unsolicited() {
        let mut client = uid_client(&[b"* 1 FETCH (UID 10 FLAGS (\\Seen))\r\n\
            * 7 FETCH (UID 90 FLAGS ())\r\n\
            * 3 FETCH (UID 12 FLAGS (\\Flagged))\r\n\
            a1 OK FETCH completed\r\n"]);
        let fetched = client.fetch(&[10, 11, 12], "(FLAGS)").unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[&12].flags(), Some(&[Flag::Flagged][..]));
        assert_eq!(commands(&client), ["a1 UID FETCH 10:12 (FLAGS)"]);

        // the unsolicited response is still remembered
        assert_eq!(client.last_fetch(90).unwrap().message, 7);
    }

    #[test]
    fn empty_fetch_sends_nothing() {
        let mut client = client(&[]);
        assert!(client.fetch(&[], "(FLAGS)").unwrap().is_empty());
        assert!(commands(&client).is_empty());
    }

    #[test]
    fn store_updates_last_fetch() {
        let mut client = uid_client(&[
            b"* 1 FETCH (UID 10 FLAGS ())\r\na1 OK FETCH completed\r\n",
            b"* 1 FETCH (UID 10 FLAGS (\\Seen))\r\na2 OK STORE completed\r\n",
        ]);
        client.fetch(&[10], "(FLAGS)").unwrap();
        client.store(10, StoreMode::Add, &[Flag::Seen]).unwrap();
        assert_eq!(client.last_fetch(10).unwrap().flags(), Some(&[Flag::Seen][..]));
        assert_eq!(commands(&client)[1], "a2 UID STORE 10 +FLAGS (\\Seen)");
    }

    #[test]
    fn silent_store_forgets_stale_flags() {
        let mut client = uid_client(&[
            b"* 1 FETCH (UID 10 FLAGS ())\r\na1 OK FETCH completed\r\n",
            b"a2 OK STORE completed\r\n",
        ]);
        client.fetch(&[10], "(FLAGS)").unwrap();
        client.store(10, StoreMode::Add, &[Flag::Seen]).unwrap();
        assert_eq!(client.last_fetch(10).unwrap().flags(), None);
    }

    #[test]
    fn expunge_is_tracked() {
        let mut client = uid_client(&[
            b"* 1 FETCH (UID 10 FLAGS ())\r\n\
              * 2 FETCH (UID 11 FLAGS ())\r\n\
              * 3 FETCH (UID 12 FLAGS ())\r\n\
              a1 OK FETCH completed\r\n",
            b"* 2 EXPUNGE\r\na2 OK STORE completed\r\n",
        ]);
        client.fetch(&[10, 11, 12], "(FLAGS)").unwrap();
        client.store(11, StoreMode::Add, &[Flag::Deleted]).unwrap();

        assert!(client.is_expunged(2));
        assert!(client.last_fetch(11).is_none());
        assert_eq!(client.seq_of(11), None);
        assert_eq!(client.seq_of(12), Some(2));
        client.reset_expunged();
        assert!(client.expunged().is_empty());
    }

    #[test]
    fn sequence_mode_addresses_by_position() {
        let mut client = client(&[
            b"* 1 FETCH (FLAGS ())\r\n* 2 FETCH (FLAGS ())\r\na1 OK FETCH completed\r\n",
            b"* 1 EXPUNGE\r\na2 OK STORE completed\r\n",
        ]);
        client.fetch(&[1, 2], "(FLAGS)").unwrap();
        client.store(1, StoreMode::Add, &[Flag::Deleted]).unwrap();
        assert!(client.last_fetch(2).is_none());
        assert_eq!(client.seq_of(2), Some(2));
    }
}
