mod token;

pub use token::CheckInCode;
