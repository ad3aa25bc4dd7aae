use crate::indicator::Position;

/// Anything able to light up a ring position, LED hardware or a console
pub trait IndicatorSink {
    fn set(&mut self, position: Position);
    fn clear(&mut self, position: Position);
}

impl<S: IndicatorSink + ?Sized> IndicatorSink for &mut S {
    fn set(&mut self, position: Position) {
        (**self).set(position)
    }

    fn clear(&mut self, position: Position) {
        (**self).clear(position)
    }
}
