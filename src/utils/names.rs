use rand::{seq::SliceRandom, Rng};

const ADJECTIVES: &[&str] = &[
    "Brave", "Cheesy", "Chunky", "Corny", "Dopey", "Electrified", "Fast", "Fluffy", "Funky",
    "Hefty", "Idyllic", "Jumpy", "Marvelous", "Nosey", "Polished", "Quiet", "Rowdy", "Simple",
    "Skinny", "Sleepy", "Slippery", "Smokey", "Smooth", "Twisted", "Unique", "Wacky", "Waxed",
    "Xanthic", "Xenial", "Yappy", "Yummy", "Zany", "Zealous", "Zesty", "Zippy",
];

const ANIMALS: &[&str] = &[
    "Anteater", "Bear", "Bonobo", "Cat", "Cheetah", "Cougar", "Dog", "Duck", "Elephant", "Ferret",
    "Giraffe", "Gorilla", "Iguana", "Ibis", "Impala", "Jackal", "Kangaroo", "Lion", "Moose",
    "Ocelot", "Orca", "Osprey", "Otter", "Parrot", "Quail", "Rabbit", "Shark", "Spider",
    "Squirrel", "Tiger", "Turtle", "Unicorn", "Wolf", "Yak", "Zebra",
];

/// Placeholder title for freshly created projects and todos, e.g. "Fluffy Otter".
pub fn random_name(rng: &mut impl Rng) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Nameless");
    let animal = ANIMALS.choose(rng).copied().unwrap_or("Thing");
    format!("{adjective} {animal}")
}
