fn split_at_str<'a>(input: &'a str, needle: &str) -> Option<(&'a str, &'a str)> {
    let end = input.find(needle)?;
    let (head, tail) = input.split_at(end);
    Some((head, &tail[needle.len()..]))
}

fn split_at_whitespace(input: &str) -> (&str, &str) {
    match input.find(|c: char| c.is_ascii_whitespace()) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

pub struct AttributeIterator<'a> {
    attrs: &'a str,
}

impl<'a> AttributeIterator<'a> {
    pub fn new(attrs: &'a str) -> Self {
        Self { attrs }
    }
}

impl<'a> Iterator for AttributeIterator<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, rest) = split_at_str(self.attrs, "=")?;
        let rest = rest.trim_start();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let (value, rest) = split_at_str(&rest[1..], if quote == '"' { "\"" } else { "'" })?;
        self.attrs = rest.trim_start();
        Some(Attribute {
            key: key.trim(),
            value,
        })
    }
}

#[test]
fn test_attribute_iterator() {
    const ATTRS: &str = r#"value="0x80E1" name='GL_BGRA_EXT'
        group = "PixelFormat""#;
    let mut iterator = AttributeIterator::new(ATTRS);
    assert_eq!(
        iterator.next(),
        Some(Attribute {
            key: "value",
            value: "0x80E1"
        })
    );
    assert_eq!(
        iterator.next(),
        Some(Attribute {
            key: "name",
            value: "GL_BGRA_EXT"
        })
    );
    assert_eq!(
        iterator.next(),
        Some(Attribute {
            key: "group",
            value: "PixelFormat"
        })
    );
    assert_eq!(iterator.next(), None);
}

#[derive(Debug, PartialEq, Eq)]
pub struct EmptyTag<'a> {
    pub name: &'a str,
    pub attrs: &'a str,
}

impl<'a> EmptyTag<'a> {
    pub fn iter_attrs(&self) -> AttributeIterator<'a> {
        AttributeIterator::new(self.attrs)
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.iter_attrs()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub attrs: &'a str,
}

impl<'a> StartTag<'a> {
    pub fn iter_attrs(&self) -> AttributeIterator<'a> {
        AttributeIterator::new(self.attrs)
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.iter_attrs()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct EndTag<'a> {
    pub name: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Element<'a> {
    EmptyTag(EmptyTag<'a>),
    StartTag(StartTag<'a>),
    EndTag(EndTag<'a>),
    Text(&'a str),
    Comment(&'a str),
}

pub struct ElementIterator<'a> {
    input: &'a str,
    line: usize,
}

impl<'a> ElementIterator<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, line: 1 }
    }

    /// 1-based line of the next unread element.
    pub fn line(&self) -> usize {
        self.line
    }

    // `rest` must be a suffix of `self.input`.
    fn advance(&mut self, rest: &'a str) {
        let consumed = &self.input[..self.input.len() - rest.len()];
        self.line += consumed.bytes().filter(|&b| b == b'\n').count();
        self.input = rest;
    }

    // <?xml ...?> declarations, other processing instructions and <!DOCTYPE ...> carry nothing
    // the registry parser needs.
    fn skip_markup_declarations(&mut self) -> Option<()> {
        loop {
            if self.input.starts_with("<?") {
                let (_, rest) = split_at_str(self.input, "?>")?;
                self.advance(rest);
            } else if self.input.starts_with("<!DOCTYPE") {
                let (_, rest) = split_at_str(self.input, ">")?;
                self.advance(rest);
            } else {
                return Some(());
            }
        }
    }

    fn next_empty_tag(&mut self) -> Option<Element<'a>> {
        debug_assert!(self.input.starts_with('<'));

        let (content, rest) = split_at_str(&self.input[1..], ">")?;
        let content = content.strip_suffix('/')?;
        let (name, attrs) = split_at_whitespace(content);

        self.advance(rest);
        Some(Element::EmptyTag(EmptyTag {
            name,
            attrs: attrs.trim(),
        }))
    }

    fn next_end_tag(&mut self) -> Option<Element<'a>> {
        let content = self.input.strip_prefix("</")?;
        let (name, rest) = split_at_str(content, ">")?;

        self.advance(rest);
        Some(Element::EndTag(EndTag { name: name.trim() }))
    }

    fn next_start_tag(&mut self) -> Option<Element<'a>> {
        debug_assert!(self.input.starts_with('<'));

        let (content, rest) = split_at_str(&self.input[1..], ">")?;
        let (name, attrs) = split_at_whitespace(content);

        self.advance(rest);
        Some(Element::StartTag(StartTag {
            name,
            attrs: attrs.trim(),
        }))
    }

    fn next_text(&mut self) -> Option<Element<'a>> {
        debug_assert!(!self.input.starts_with('<'));

        match self.input.find('<') {
            Some(end) => {
                let (content, rest) = self.input.split_at(end);
                self.advance(rest);
                Some(Element::Text(content))
            }
            None => {
                let content = self.input;
                self.advance("");
                Some(Element::Text(content))
            }
        }
    }

    fn next_comment(&mut self) -> Option<Element<'a>> {
        let (content, rest) = split_at_str(&self.input[4..], "-->")?;
        self.advance(rest);
        Some(Element::Comment(content))
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_markup_declarations()?;
        if self.input.is_empty() {
            None
        } else if self.input.starts_with("<!--") {
            self.next_comment()
        } else if self.input.starts_with("</") {
            self.next_end_tag()
        } else if self.input.starts_with('<') {
            self.next_empty_tag().or_else(|| self.next_start_tag())
        } else {
            self.next_text()
        }
    }
}

#[test]
fn test_skips_declaration_and_doctype() {
    const INPUT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE registry>
<registry>"#;
    let mut iterator = ElementIterator::new(INPUT);
    assert_eq!(iterator.next(), Some(Element::Text("\n")));
    assert_eq!(iterator.next(), Some(Element::Text("\n")));
    assert_eq!(
        iterator.next(),
        Some(Element::StartTag(StartTag {
            name: "registry",
            attrs: ""
        }))
    );
    assert_eq!(iterator.next(), None);
}

#[test]
fn test_next_empty_tag() {
    const INPUT: &str = r#"<enum value="0x80E0" name="GL_BGR_EXT"/>"#;
    assert_eq!(
        ElementIterator::new(INPUT).next(),
        Some(Element::EmptyTag(EmptyTag {
            name: "enum",
            attrs: r#"value="0x80E0" name="GL_BGR_EXT""#
        }))
    );
}

#[test]
fn test_next_end_tag() {
    assert_eq!(
        ElementIterator::new("</extension>").next(),
        Some(Element::EndTag(EndTag { name: "extension" }))
    );
}

#[test]
fn test_next_start_tag_with_newline_before_attrs() {
    const INPUT: &str = "<extension\n    name=\"GL_EXT_bgra\" supported=\"gl\">";
    let Some(Element::StartTag(start)) = ElementIterator::new(INPUT).next() else {
        panic!("expected start tag");
    };
    assert_eq!(start.name, "extension");
    assert_eq!(start.attr("name"), Some("GL_EXT_bgra"));
    assert_eq!(start.attr("supported"), Some("gl"));
    assert_eq!(start.attr("comment"), None);
}

#[test]
fn test_next_text() {
    assert_eq!(
        ElementIterator::new("const <ptype>").next(),
        Some(Element::Text("const "))
    );
}

#[test]
fn test_next_comment() {
    const INPUT: &str = "<!-- SECTION: GL command definitions. -->";
    assert_eq!(
        ElementIterator::new(INPUT).next(),
        Some(Element::Comment(" SECTION: GL command definitions. ")),
    );
}

#[test]
fn test_line() {
    const INPUT: &str = "<a>\n<b/>\n\n<c/>";
    let mut iterator = ElementIterator::new(INPUT);
    assert_eq!(iterator.line(), 1);
    iterator.next(); // <a>
    iterator.next(); // \n
    assert_eq!(iterator.line(), 2);
    iterator.next(); // <b/>
    iterator.next(); // \n\n
    assert_eq!(iterator.line(), 4);
}

#[test]
fn test_line_counts_every_consumed_newline() {
    let input = "<registry>\n".to_string() + &"<command/>\n<!--\n-->\n".repeat(5000) + "<end/>";
    let mut iterator = ElementIterator::new(&input);
    let mut last = 0;
    while let Some(element) = iterator.next() {
        if matches!(element, Element::EmptyTag(EmptyTag { name: "end", .. })) {
            last = iterator.line();
        }
    }
    assert_eq!(last, 2 + 5000 * 3);
    assert_eq!(iterator.line(), 2 + 5000 * 3);
}
