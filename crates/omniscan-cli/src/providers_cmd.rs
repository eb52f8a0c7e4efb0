use omniscan::Provider;

pub fn run() -> Result<(), i32> {
    println!("key\tbank");
    for provider in Provider::all() {
        println!("{}\t{}", provider.key(), provider.bank_name());
    }
    Ok(())
}
