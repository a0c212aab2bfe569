macro_rules! verify {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::Error::Constraint($msg));
        }
    };
}
pub(crate) use verify;
