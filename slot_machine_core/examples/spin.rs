use slot_machine_core::{spin_once, ReelGenerator, SpinRng, ZeroPayout};

fn main() {
    // Example end-to-end spin with a fixed seed
    let mut generator = ReelGenerator::new(SpinRng::seeded(2024));
    let outcome = spin_once(&mut generator, &ZeroPayout, 1.0);
    print!("{}", outcome.grid);
    println!("winnings={}", outcome.winnings);
}
