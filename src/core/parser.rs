//! Per-item transforms applied before an item enters the buffer

/// Transform from a raw source item into the item handed to the batch handler
pub trait ItemParser<In>: Send + Sync {
    type Output: Send;

    fn parse(&self, raw: In) -> Self::Output;
}

/// Pass-through parser, the default
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<In: Send> ItemParser<In> for Identity {
    type Output = In;

    fn parse(&self, raw: In) -> In {
        raw
    }
}

/// Parser built from a closure, see [`parser_fn`]
#[derive(Debug, Clone, Copy)]
pub struct ParserFn<F> {
    f: F,
}

/// Wrap `Fn(In) -> Out` as a parser
pub fn parser_fn<F>(f: F) -> ParserFn<F> {
    ParserFn { f }
}

impl<In, Out, F> ItemParser<In> for ParserFn<F>
where
    F: Fn(In) -> Out + Send + Sync,
    Out: Send,
{
    type Output = Out;

    fn parse(&self, raw: In) -> Out {
        (self.f)(raw)
    }
}
