use std::num;

quick_error! {
    #[derive(Debug)]
    pub enum BinError {
        Gifstamp(err: gifstamp::Error) {
            from()
            display("{}", err)
            source(err)
        }
        Num(err: num::ParseIntError) {
            from()
            display("Invalid number: {}", err)
            source(err)
        }
        Arg(msg: String) {
            display("{}", msg)
        }
        MissingArg(name: &'static str) {
            display("Missing --{}", name)
        }
        MissingClientId {
            display("Missing API client ID; pass --client-id or set IMGUR_CLIENT_ID")
        }
    }
}

pub type BinResult<T, E = BinError> = Result<T, E>;
