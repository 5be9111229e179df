mod pair;
pub use self::pair::ExchangePair;
