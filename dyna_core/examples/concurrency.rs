use dyna_core::DynamicArray;
use std::thread;

fn main() {
    println!("--- Cross-thread Ownership Transfer Example ---");
    let mut arr = DynamicArray::create(4).unwrap();
    for i in 0..10 {
        arr.push_back(i).unwrap();
    }

    println!("Original array (thread main): {:?}", arr);

    // Move ownership to another thread
    let handle = thread::spawn(move || {
        arr.for_each(|x| *x *= 2);
        arr.push_back(100).unwrap();
        arr // Return ownership back
    });

    let arr = handle.join().unwrap();
    println!("Array back in main thread: {:?}", arr);
    println!("All even: {}", arr.all_of(|x| x % 2 == 0));
}
