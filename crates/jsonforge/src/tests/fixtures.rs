use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::record;

/// Singly linked through `next`; every level is one more nested object.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Node {
    pub next: Option<Box<Node>>,
}

record!(Node {
    next: Option<Box<Node>> => "next" [omitempty],
});

impl Node {
    pub(crate) fn nested_input(levels: usize) -> Vec<u8> {
        let mut out = br#"{"next":"#.repeat(levels);
        out.extend_from_slice(b"null");
        out.extend_from_slice(&b"}".repeat(levels));
        out
    }

    pub(crate) fn len(&self) -> usize {
        let mut n = 1;
        let mut cur = self;
        while let Some(next) = cur.next.as_deref() {
            n += 1;
            cur = next;
        }
        n
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Foo {
    pub blah: i64,
}

record!(Foo {
    blah: i64 => "Blah",
});

/// An access log line.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LogRecord {
    pub timestamp: i64,
    pub origin_id: u32,
    pub bar: Foo,
    pub method: String,
    pub req_id: String,
    pub server_ip: String,
    pub remote_ip: String,
    pub bytes_sent: u64,
}

record!(LogRecord {
    timestamp: i64 => "id" [omitempty],
    origin_id: u32 => "OriginId",
    bar: Foo => "Bar",
    method: String => "meth",
    req_id: String => "ReqId",
    server_ip: String => "ServerIp",
    remote_ip: String => "RemoteIP",
    bytes_sent: u64 => "BytesSent",
});

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AllOmitted {
    pub count: u32,
    pub name: String,
    pub tags: Vec<String>,
    pub parent: Option<Box<Foo>>,
    pub ratio: f64,
    pub on: bool,
}

record!(AllOmitted {
    count: u32 => "count" [omitempty],
    name: String => "name" [omitempty],
    tags: Vec<String> => "tags" [omitempty],
    parent: Option<Box<Foo>> => "parent" [omitempty],
    ratio: f64 => "ratio" [omitempty],
    on: bool => "on" [omitempty],
});

/// One field of every strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Everything {
    pub small: i8,
    pub medium: i32,
    pub large: i64,
    pub byte: u8,
    pub word: u16,
    pub unsigned: u64,
    pub single: f32,
    pub double: f64,
    pub flag: bool,
    pub text: String,
    pub letter: char,
    pub maybe: Option<u32>,
    pub list: Vec<String>,
    pub map: BTreeMap<String, i32>,
    pub children: Vec<Foo>,
    pub boxed: Box<Foo>,
    pub quoted_number: u64,
    pub quoted_text: String,
    pub quoted_maybe: Option<i16>,
}

record!(Everything {
    small: i8 => "small",
    medium: i32 => "medium",
    large: i64 => "large" [omitempty],
    byte: u8 => "byte",
    word: u16 => "word",
    unsigned: u64 => "unsigned",
    single: f32 => "single",
    double: f64 => "double" [omitempty],
    flag: bool => "flag",
    text: String => "text",
    letter: char => "letter",
    maybe: Option<u32> => "maybe",
    list: Vec<String> => "list" [omitempty],
    map: BTreeMap<String, i32> => "map",
    children: Vec<Foo> => "children",
    boxed: Box<Foo> => "boxed",
    quoted_number: u64 => "quotedNumber" [string, omitempty],
    quoted_text: String => "quotedText" [string],
    quoted_maybe: Option<i16> => "quotedMaybe" [string],
});

pub(crate) fn finite_f64(g: &mut Gen) -> f64 {
    loop {
        let v = f64::arbitrary(g);
        if v.is_finite() {
            return v;
        }
    }
}

fn finite_f32(g: &mut Gen) -> f32 {
    loop {
        let v = f32::arbitrary(g);
        if v.is_finite() {
            return v;
        }
    }
}

impl Arbitrary for Foo {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            blah: i64::arbitrary(g),
        }
    }
}

impl Arbitrary for LogRecord {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            timestamp: i64::arbitrary(g),
            origin_id: u32::arbitrary(g),
            bar: Foo::arbitrary(g),
            method: String::arbitrary(g),
            req_id: String::arbitrary(g),
            server_ip: String::arbitrary(g),
            remote_ip: String::arbitrary(g),
            bytes_sent: u64::arbitrary(g),
        }
    }
}

impl Arbitrary for Everything {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            small: i8::arbitrary(g),
            medium: i32::arbitrary(g),
            large: i64::arbitrary(g),
            byte: u8::arbitrary(g),
            word: u16::arbitrary(g),
            unsigned: u64::arbitrary(g),
            single: finite_f32(g),
            double: finite_f64(g),
            flag: bool::arbitrary(g),
            text: String::arbitrary(g),
            letter: char::arbitrary(g),
            maybe: Option::arbitrary(g),
            list: Vec::arbitrary(g),
            map: BTreeMap::arbitrary(g),
            children: Vec::arbitrary(g),
            boxed: Box::new(Foo::arbitrary(g)),
            quoted_number: u64::arbitrary(g),
            quoted_text: String::arbitrary(g),
            quoted_maybe: Option::arbitrary(g),
        }
    }
}
