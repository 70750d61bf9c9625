use std::env;

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: print_ast <path.roi>");
        std::process::exit(2);
    });
    match roidsl_frontend::parse_file(&path) {
        Ok(ast) => {
            println!("{:#?}", ast);
        }
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(1);
        }
    }
}
