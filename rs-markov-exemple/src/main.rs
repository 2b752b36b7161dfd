use rs_markov_core::model::generator::TextGenerator;
use rs_markov_core::model::markov_model::MarkovModel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a model from the corpus with a 5-character window.
    // A corpus.bin cache is written next to the file and reused on later
    // runs (a different window length forces a rebuild).
    let model = MarkovModel::from_corpus_file("./data/corpus.txt", 5)?;
    println!(
        "Model ready: {} contexts (window length {})",
        model.len(),
        model.window_length()
    );

    // A window length of 0 is rejected at construction
    match MarkovModel::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Window length 0 is invalid, must be >= 1"),
    }

    // Seeded generator: the same seed value always produces the same texts
    let mut generator = TextGenerator::seeded(model, 42);

    // A seed text shorter than the window is returned unchanged
    println!("Short seed: {:?}", generator.generate("ab", 50));

    // A seed text whose trailing window never appeared in the corpus is a
    // dead end: generation stops immediately and returns the seed
    println!("Dead end: {:?}", generator.generate("@@@@@", 50));

    // Generate 10 texts of up to 120 characters each, continuing the
    // opening of the corpus (generation may stop earlier on a dead end)
    let seed_text = "The f";
    for i in 0..10 {
        println!("Generated text {}: {}", i + 1, generator.generate(seed_text, 120));
    }

    Ok(())
}
