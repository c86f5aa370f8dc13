//===========================================================================//

macro_rules! invalid_argument {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidArgument(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidArgument(
            format!($fmt, $($arg)+),
        ))
    };
}

macro_rules! invalid_data {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidData(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidData(
            format!($fmt, $($arg)+),
        ))
    };
}

//===========================================================================//
