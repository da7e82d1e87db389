//! Parsers for the server responses a message list consumes.
//!
//! SEARCH, SORT, THREAD, CAPABILITY, EXISTS, EXPUNGE and tagged completions are small enough to
//! parse here with nom; FETCH responses, with their envelopes, body structures and literals, are
//! handed to `imap-proto`.

use lazy_static::lazy_static;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, line_ending, not_line_ending, space0, space1},
    combinator::{map, map_res},
    multi::many0,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use regex::bytes::Regex;

use crate::error::{Error, ParseError, Result};
use crate::types::{Capabilities, Fetch, Seq, ThreadNode};

lazy_static! {
    static ref LITERAL_START: Regex = Regex::new(r"(?-u)~?\{(\d+)\}\r\n\z").unwrap();
}

/// The completion status of a tagged response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Status {
    Ok,
    No,
    Bad,
}

/// A tagged completion: `a3 OK SORT completed`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Completion<'a> {
    pub tag: &'a [u8],
    pub status: Status,
    pub information: &'a [u8],
}

/// The untagged responses we act on. Anything else comes out as [`Untagged::Other`].
#[derive(Debug, PartialEq)]
pub(crate) enum Untagged {
    /// `* SEARCH ...` or `* SORT ...`
    Ids(Vec<u32>),
    Thread(Vec<ThreadNode>),
    Capabilities(Capabilities),
    Exists(u32),
    Expunge(Seq),
    Fetch(Fetch),
    Other,
}

/// If `line` (ending in CRLF) announces a literal, the number of octets that follow it.
pub(crate) fn literal_length(line: &[u8]) -> Option<usize> {
    LITERAL_START
        .captures(line)
        .and_then(|c| c.get(1))
        .and_then(|n| std::str::from_utf8(n.as_bytes()).ok())
        .and_then(|n| n.parse().ok())
}

fn number(i: &[u8]) -> IResult<&[u8], u32> {
    map_res(map_res(digit1, std::str::from_utf8), |s: &str| s.parse::<u32>())(i)
}

fn atom(i: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|b: u8| b > b' ' && b != b'(' && b != b')' && b != 0x7f)(i)
}

fn end_of_line(i: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(space0, line_ending)(i)
}

fn status(i: &[u8]) -> IResult<&[u8], Status> {
    alt((
        map(tag_no_case("OK"), |_| Status::Ok),
        map(tag_no_case("NO"), |_| Status::No),
        map(tag_no_case("BAD"), |_| Status::Bad),
    ))(i)
}

fn completion(i: &[u8]) -> IResult<&[u8], Completion<'_>> {
    map(
        tuple((
            terminated(atom, space1),
            status,
            terminated(preceded(space0, not_line_ending), line_ending),
        )),
        |(tag, status, information)| Completion {
            tag,
            status,
            information,
        },
    )(i)
}

fn ids_response(i: &[u8]) -> IResult<&[u8], Vec<u32>> {
    delimited(
        tuple((tag("* "), alt((tag_no_case("SEARCH"), tag_no_case("SORT"))))),
        many0(preceded(space1, number)),
        end_of_line,
    )(i)
}

fn thread_list(i: &[u8]) -> IResult<&[u8], ThreadNode> {
    map(
        delimited(
            char('('),
            many0(preceded(
                space0,
                alt((map(number, ThreadNode::Message), thread_list)),
            )),
            preceded(space0, char(')')),
        ),
        ThreadNode::Branch,
    )(i)
}

fn thread_response(i: &[u8]) -> IResult<&[u8], Vec<ThreadNode>> {
    delimited(
        tuple((tag("* "), tag_no_case("THREAD"))),
        many0(preceded(space0, thread_list)),
        end_of_line,
    )(i)
}

fn capability_response(i: &[u8]) -> IResult<&[u8], Vec<&[u8]>> {
    delimited(
        tuple((tag("* "), tag_no_case("CAPABILITY"))),
        many0(preceded(space1, atom)),
        end_of_line,
    )(i)
}

fn counted_response<'a>(
    name: &'static str,
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], u32> {
    delimited(
        tag("* "),
        number,
        tuple((space1, tag_no_case(name), end_of_line)),
    )
}

fn fetch_prefix(i: &[u8]) -> IResult<&[u8], u32> {
    preceded(tag("* "), terminated(number, tuple((space1, tag_no_case("FETCH")))))(i)
}

/// Parse a tagged completion, or `None` if `response` is untagged or a continuation request.
pub(crate) fn parse_completion(response: &[u8]) -> Option<Completion<'_>> {
    if response.starts_with(b"* ") || response.starts_with(b"+") {
        return None;
    }
    completion(response).ok().map(|(_, c)| c)
}

/// Parse one complete untagged response, literals included.
pub(crate) fn parse_untagged(response: &[u8]) -> Result<Untagged> {
    if let Ok((_, ids)) = ids_response(response) {
        return Ok(Untagged::Ids(ids));
    }
    if let Ok((_, threads)) = thread_response(response) {
        return Ok(Untagged::Thread(threads));
    }
    if let Ok((_, caps)) = capability_response(response) {
        let caps = caps
            .into_iter()
            .map(std::str::from_utf8)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Parse(ParseError::DataNotUtf8(e)))?;
        return Ok(Untagged::Capabilities(caps.into_iter().collect()));
    }
    if let Ok((_, n)) = counted_response("EXISTS")(response) {
        return Ok(Untagged::Exists(n));
    }
    if let Ok((_, n)) = counted_response("EXPUNGE")(response) {
        return Ok(Untagged::Expunge(n));
    }
    if fetch_prefix(response).is_ok() {
        return match imap_proto::Response::from_bytes(response) {
            Ok((_, imap_proto::Response::Fetch(seq, attrs))) => {
                Ok(Untagged::Fetch(Fetch::from_attributes(seq, &attrs)))
            }
            _ => Err(Error::Parse(ParseError::Invalid(response.to_vec()))),
        };
    }
    log::trace!(
        "ignoring response: {}",
        String::from_utf8_lossy(response).trim_end()
    );
    Ok(Untagged::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Flag;
    use ThreadNode::{Branch, Message};

    #[test]
    fn parse_completions() {
        let c = parse_completion(b"a12 OK [READ-WRITE] SELECT completed\r\n").unwrap();
        assert_eq!(c.tag, b"a12");
        assert_eq!(c.status, Status::Ok);
        assert_eq!(c.information, b"[READ-WRITE] SELECT completed");

        let c = parse_completion(b"a2 NO no such mailbox\r\n").unwrap();
        assert_eq!(c.status, Status::No);
        assert_eq!(c.information, b"no such mailbox");

        let c = parse_completion(b"a3 bad\r\n").unwrap();
        assert_eq!(c.status, Status::Bad);
        assert_eq!(c.information, b"");

        assert_eq!(parse_completion(b"* OK still here\r\n"), None);
        assert_eq!(parse_completion(b"+ go ahead\r\n"), None);
    }

    #[test]
    fn parse_search_and_sort() {
        assert_eq!(
            parse_untagged(b"* SEARCH 2 3 6\r\n").unwrap(),
            Untagged::Ids(vec![2, 3, 6])
        );
        assert_eq!(
            parse_untagged(b"* SORT 5 3 4 1 2 \r\n").unwrap(),
            Untagged::Ids(vec![5, 3, 4, 1, 2])
        );
        assert_eq!(
            parse_untagged(b"* SEARCH\r\n").unwrap(),
            Untagged::Ids(vec![])
        );
    }

    #[test]
    fn parse_thread() {
        let threads = match parse_untagged(b"* THREAD (2)(3 6 (4 23)(44 7 96))\r\n").unwrap() {
            Untagged::Thread(t) => t,
            r => panic!("expected a thread response, got {:?}", r),
        };
        assert_eq!(
            threads,
            vec![
                Branch(vec![Message(2)]),
                Branch(vec![
                    Message(3),
                    Message(6),
                    Branch(vec![Message(4), Message(23)]),
                    Branch(vec![Message(44), Message(7), Message(96)]),
                ]),
            ]
        );

        assert_eq!(
            parse_untagged(b"* THREAD ((3)(5))\r\n").unwrap(),
            Untagged::Thread(vec![Branch(vec![
                Branch(vec![Message(3)]),
                Branch(vec![Message(5)]),
            ])])
        );
        assert_eq!(
            parse_untagged(b"* THREAD\r\n").unwrap(),
            Untagged::Thread(vec![])
        );
    }

    #[test]
    fn parse_capability() {
        let caps = match parse_untagged(b"* CAPABILITY IMAP4rev1 SORT THREAD=REFERENCES AUTH=PLAIN\r\n")
            .unwrap()
        {
            Untagged::Capabilities(caps) => caps,
            r => panic!("expected capabilities, got {:?}", r),
        };
        assert_eq!(caps.len(), 4);
        assert!(caps.has("thread=references"));
        assert!(caps.has("AUTH=PLAIN"));
        assert!(!caps.has("THREAD=ORDEREDSUBJECT"));
    }

    #[test]
    fn parse_counts() {
        assert_eq!(parse_untagged(b"* 22 EXISTS\r\n").unwrap(), Untagged::Exists(22));
        assert_eq!(parse_untagged(b"* 4 EXPUNGE\r\n").unwrap(), Untagged::Expunge(4));
        assert_eq!(parse_untagged(b"* 1 RECENT\r\n").unwrap(), Untagged::Other);
        assert_eq!(parse_untagged(b"* OK [UIDNEXT 4392] Predicted next UID\r\n").unwrap(), Untagged::Other);
    }

    #[test]
    fn parse_fetch() {
        let response = b"* 24 FETCH (FLAGS (\\Seen Custom) UID 4827 RFC822.SIZE 1024 INTERNALDATE \"17-Jul-1996 02:44:25 -0700\")\r\n";
        let fetch = match parse_untagged(response).unwrap() {
            Untagged::Fetch(f) => f,
            r => panic!("expected a fetch, got {:?}", r),
        };
        assert_eq!(fetch.message, 24);
        assert_eq!(fetch.uid, Some(4827));
        assert_eq!(fetch.size(), Some(1024));
        assert_eq!(
            fetch.flags(),
            Some(&[Flag::Seen, Flag::Custom("Custom".to_string())][..])
        );
        assert_eq!(fetch.internal_date().unwrap().timestamp(), 837_596_665);
    }

    #[test]
    fn parse_fetch_with_literal() {
        let response = b"* 2 FETCH (UID 7 BODY[HEADER.FIELDS (REFERENCES)] {23}\r\nReferences: <a@b.c>\r\n\r\n)\r\n";
        assert_eq!(literal_length(b"* 2 FETCH (UID 7 BODY[HEADER.FIELDS (REFERENCES)] {23}\r\n"), Some(23));
        let fetch = match parse_untagged(response).unwrap() {
            Untagged::Fetch(f) => f,
            r => panic!("expected a fetch, got {:?}", r),
        };
        assert_eq!(fetch.uid, Some(7));
        assert_eq!(fetch.section(), Some(&b"References: <a@b.c>\r\n\r\n"[..]));
    }

    #[test]
    fn broken_fetch_is_an_error() {
        match parse_untagged(b"* 2 FETCH (UID\r\n") {
            Err(Error::Parse(ParseError::Invalid(_))) => {}
            r => panic!("expected a parse error, got {:?}", r),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(literal_length(b"* 1 FETCH (BODY[] {342}\r\n"), Some(342));
        assert_eq!(literal_length(b"* 1 FETCH (BODY[] ~{5}\r\n"), Some(5));
        assert_eq!(literal_length(b"* 1 FETCH (UID 3)\r\n"), None);
        assert_eq!(literal_length(b"* OK {5} is not at the end\r\n"), None);
    }
}
