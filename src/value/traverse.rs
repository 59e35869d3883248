use std::{borrow::Cow, collections::btree_map, slice};

use super::Value;

/// Callbacks for a depth-first walk over a [`Value`].
///
/// Dictionary entries arrive in raw key order, each `key` call directly followed by the
/// events of its value. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait Visitor {
    /// A byte string, either a list member or a dictionary value.
    fn bytes(&mut self, bytes: &[u8]) {}
    /// An integer.
    fn integer(&mut self, value: i64) {}
    /// A list with `len` members opens.
    fn begin_list(&mut self, len: usize) {}
    /// The innermost open list closes.
    fn end_list(&mut self) {}
    /// A dictionary with `len` entries opens.
    fn begin_dict(&mut self, len: usize) {}
    /// The key of the next dictionary entry.
    fn key(&mut self, key: &[u8]) {}
    /// The innermost open dictionary closes.
    fn end_dict(&mut self) {}
}

enum Frame<'v, 'a> {
    List(slice::Iter<'v, Value<'a>>),
    Dict(btree_map::Iter<'v, Cow<'a, [u8]>, Value<'a>>),
}

impl<'a> Value<'a> {
    /// Feed every node of this value to `visitor`.
    ///
    /// The walk keeps its own stack, so arbitrarily deep values never exhaust the call
    /// stack.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let mut stack: Vec<Frame<'_, 'a>> = Vec::new();
        let mut next = Some(self);

        loop {
            if let Some(value) = next.take() {
                match value {
                    Value::Bytes(bytes) => visitor.bytes(bytes),
                    Value::Integer(integer) => visitor.integer(*integer),
                    Value::List(list) => {
                        visitor.begin_list(list.len());
                        stack.push(Frame::List(list.iter()));
                    },
                    Value::Dict(dict) => {
                        visitor.begin_dict(dict.len());
                        stack.push(Frame::Dict(dict.iter()));
                    },
                }
            }

            match stack.last_mut() {
                None => return,
                Some(Frame::List(items)) => match items.next() {
                    Some(item) => next = Some(item),
                    None => {
                        stack.pop();
                        visitor.end_list();
                    },
                },
                Some(Frame::Dict(entries)) => match entries.next() {
                    Some((key, value)) => {
                        visitor.key(key);
                        next = Some(value);
                    },
                    None => {
                        stack.pop();
                        visitor.end_dict();
                    },
                },
            }
        }
    }

    /// Nesting depth: atoms are 0, a container is one more than its deepest member.
    pub fn depth(&self) -> usize {
        #[derive(Default)]
        struct Depth {
            current: usize,
            max: usize,
        }

        impl Depth {
            fn open(&mut self) {
                self.current += 1;
                self.max = self.max.max(self.current);
            }
        }

        impl Visitor for Depth {
            fn begin_list(&mut self, _len: usize) {
                self.open();
            }

            fn begin_dict(&mut self, _len: usize) {
                self.open();
            }

            fn end_list(&mut self) {
                self.current -= 1;
            }

            fn end_dict(&mut self) {
                self.current -= 1;
            }
        }

        let mut depth = Depth::default();
        self.walk(&mut depth);
        depth.max
    }

    /// Number of values in the tree, this one included. Dictionary keys are not counted.
    pub fn node_count(&self) -> usize {
        struct Count(usize);

        impl Visitor for Count {
            fn bytes(&mut self, _bytes: &[u8]) {
                self.0 += 1;
            }

            fn integer(&mut self, _value: i64) {
                self.0 += 1;
            }

            fn begin_list(&mut self, _len: usize) {
                self.0 += 1;
            }

            fn begin_dict(&mut self, _len: usize) {
                self.0 += 1;
            }
        }

        let mut count = Count(0);
        self.walk(&mut count);
        count.0
    }
}
