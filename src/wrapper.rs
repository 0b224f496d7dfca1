use crate::buffer::OverflowPolicy;

pub trait FrameWrapper<I> {
    fn into_inner(self) -> I;
}

pub trait FrameIo {
    fn set_overflow_policy(&mut self, policy: OverflowPolicy);
}
