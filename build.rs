use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // Boards with a 32.768 kHz crystal on XIN32/XOUT32.
        xosc32k: { not(feature = "crystalless") },
    }
}
