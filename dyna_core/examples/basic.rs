use dyna_core::{ArrayError, DynamicArray};

fn main() -> Result<(), ArrayError> {
    println!("--- Basic Usage Example ---");
    let mut arr = DynamicArray::create(1)?;

    // Push elements
    for i in 1..=5 {
        arr.push_back(i * 10)?;
        println!("Pushed: {}, size: {}, cap: {}, bytes: {}", i * 10, arr.size(), arr.capacity(), arr.memsize());
    }

    println!("Elements: {:?}", arr);
    println!("Any above 30: {}", arr.any_of(|x| *x > 30));
    println!("First above 30: {:?}", arr.find_if(|x| *x > 30));

    // Pop elements
    while let Some(val) = arr.pop_back() {
        println!("Popped: {}, size: {}", val, arr.size());
    }

    arr.shrink()?;
    println!("After shrink, cap: {}", arr.capacity());
    arr.destroy();
    Ok(())
}
