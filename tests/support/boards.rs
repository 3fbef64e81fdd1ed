use std::path::Path;

/// Write a CSV with nine board columns (`c0`..`c8`) and a trailing `Outcome` column.
pub fn write_board_csv(path: &Path, rows: &[([i8; 9], u8)]) {
    let mut text = String::from("c0,c1,c2,c3,c4,c5,c6,c7,c8,Outcome\n");
    for (cells, outcome) in rows {
        let cells: Vec<String> = cells.iter().map(|cell| cell.to_string()).collect();
        text.push_str(&cells.join(","));
        text.push_str(&format!(",{outcome}\n"));
    }
    std::fs::write(path, text).unwrap();
}

/// Deterministic pseudo-random board of 0/1 cells for `row`.
pub fn binary_board(row: usize) -> [i8; 9] {
    let mut cells = [0i8; 9];
    let mut state = (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0xD1B5_4A32_D192_ED03;
    for cell in &mut cells {
        state ^= state >> 29;
        state = state.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        *cell = (state >> 63) as i8;
    }
    cells
}

/// `rows` binary boards that are all wins.
pub fn all_wins(rows: usize) -> Vec<([i8; 9], u8)> {
    (0..rows).map(|row| (binary_board(row), 1)).collect()
}

/// Boards labelled by whether the top row is all ones, with every seventh label flipped.
pub fn noisy_top_row(rows: usize) -> Vec<([i8; 9], u8)> {
    (0..rows)
        .map(|row| {
            let board = binary_board(row);
            let win = board[0] == 1 && board[1] == 1 && board[2] == 1;
            let flip = row % 7 == 0;
            (board, u8::from(win != flip))
        })
        .collect()
}
