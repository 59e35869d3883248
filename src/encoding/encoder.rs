use crate::{
    state_tracker::Token,
    value::{Value, Visitor},
};

/// Encode `value` into a fresh buffer.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut output = Vec::new();
    encode_into(value, &mut output);
    output
}

/// Append the encoding of `value` to `output`.
///
/// ```
/// use bencode_metainfo::{Value, encoding::encode_into};
///
/// let mut buffer = b"prefix:".to_vec();
/// encode_into(&Value::from(7), &mut buffer);
/// assert_eq!(buffer, b"prefix:i7e");
/// ```
pub fn encode_into(value: &Value, output: &mut Vec<u8>) {
    value.walk(&mut Encoder { output });
}

/// Writes every visited node as tokens. Unlike the decoder this is not zero-copy; the
/// output owns its bytes.
struct Encoder<'o> {
    output: &'o mut Vec<u8>,
}

impl Encoder<'_> {
    fn emit_token(&mut self, token: Token) {
        match token {
            Token::List => self.output.push(b'l'),
            Token::Dict => self.output.push(b'd'),
            Token::String(s) => {
                let length = s.len().to_string();
                self.output.extend_from_slice(length.as_bytes());
                self.output.push(b':');
                self.output.extend_from_slice(s);
            },
            Token::Num(num) => {
                self.output.push(b'i');
                self.output.extend_from_slice(num.as_bytes());
                self.output.push(b'e');
            },
            Token::End => self.output.push(b'e'),
        }
    }
}

impl Visitor for Encoder<'_> {
    fn bytes(&mut self, bytes: &[u8]) {
        self.emit_token(Token::String(bytes));
    }

    fn integer(&mut self, value: i64) {
        self.emit_token(Token::Num(&value.to_string()));
    }

    fn begin_list(&mut self, _len: usize) {
        self.emit_token(Token::List);
    }

    fn end_list(&mut self) {
        self.emit_token(Token::End);
    }

    fn begin_dict(&mut self, _len: usize) {
        self.emit_token(Token::Dict);
    }

    // Keys come out of the map already sorted.
    fn key(&mut self, key: &[u8]) {
        self.emit_token(Token::String(key));
    }

    fn end_dict(&mut self) {
        self.emit_token(Token::End);
    }
}
