//! Move test table shared by unit tests, the reference oracle and the
//! `variants` tool.
//!
//! Each case is a board, a direction, the expected board and whether the
//! move changed anything. Boards use the 16-character layout of
//! [`Board`](crate::engine::Board): index 0 is the bottom-right cell.

use crate::engine::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Case {
    pub board: &'static str,
    pub dir: Move,
    pub result: &'static str,
    pub moved: bool,
}

const fn case(board: &'static str, dir: Move, result: &'static str, moved: bool) -> Case {
    Case { board, dir, result, moved }
}

#[rustfmt::skip]
pub const CASES: &[Case] = &[
    case("                ", Move::Left, "                ", false),
    case("                ", Move::Right, "                ", false),
    case("                ", Move::Up, "                ", false),
    case("                ", Move::Down, "                ", false),
    case("123456789abcdefg", Move::Left, "123456789abcdefg", false),
    case("123456789abcdefg", Move::Right, "123456789abcdefg", false),
    case("123456789abcdefg", Move::Up, "123456789abcdefg", false),
    case("123456789abcdefg", Move::Down, "123456789abcdefg", false),

    // move
    case("     1          ", Move::Left, "       1        ", true),
    case("     1          ", Move::Right, "    1           ", true),
    case("     1          ", Move::Up, "             1  ", true),
    case("     1          ", Move::Down, " 1              ", true),

    // merge
    case(" 11             ", Move::Left, "   2            ", true),
    case(" 11             ", Move::Right, "2               ", true),
    case("     1   1      ", Move::Up, "             2  ", true),
    case("     1   1      ", Move::Down, " 2              ", true),

    // move with gap 1
    case("    1 2         ", Move::Left, "      12        ", true),
    case("     1 2        ", Move::Right, "    12          ", true),
    case(" 1       2      ", Move::Up, "         1   2  ", true),
    case("     1       2  ", Move::Down, " 1   2          ", true),

    // merge with gap 1
    case("    2 2         ", Move::Left, "       3        ", true),
    case("     2 2        ", Move::Right, "    3           ", true),
    case(" 2       2      ", Move::Up, "             3  ", true),
    case("     2       2  ", Move::Down, " 3              ", true),

    // move with gap 2
    case("    2  2        ", Move::Left, "       3        ", true),
    case("    2  2        ", Move::Right, "    3           ", true),
    case("  1           2 ", Move::Up, "          1   2 ", true),
    case("  1           2 ", Move::Down, "  1   2         ", true),

    // merge with gap 2
    case("    2  2        ", Move::Left, "       3        ", true),
    case("    2  2        ", Move::Right, "    3           ", true),
    case("  2           2 ", Move::Up, "              3 ", true),
    case("  2           2 ", Move::Down, "  3             ", true),

    // combined test
    case("3311            ", Move::Left, "  42            ", true),
    case("3311            ", Move::Right, "42              ", true),
    case("3   3   1   1   ", Move::Up, "        4   2   ", true),
    case("3   3   1   1   ", Move::Down, "4   2           ", true),

    // multi merge
    case("1111            ", Move::Left, "  22            ", true),
    case("1111            ", Move::Right, "22              ", true),
    case("1   1   1   1   ", Move::Up, "        2   2   ", true),
    case("1   1   1   1   ", Move::Down, "2   2           ", true),

    // slide past a different tile
    case("121             ", Move::Left, " 121            ", true),
    case(" 121            ", Move::Right, "121             ", true),
    case("1   2   1       ", Move::Up, "    1   2   1   ", true),
    case("    1   2   1   ", Move::Down, "1   2   1       ", true),

    // shift and merge
    case("111             ", Move::Left, "  12            ", true),
    case("111             ", Move::Right, "21              ", true),
    case("1   1   1       ", Move::Up, "        1   2   ", true),
    case("    1   1   1   ", Move::Down, "2   1           ", true),

    // full boards with no legal slide
    case("1231123112311231", Move::Left, "1231123112311231", false),
    case("1231123112311231", Move::Right, "1231123112311231", false),
    case("1111222233331111", Move::Up, "1111222233331111", false),
    case("1111222233331111", Move::Down, "1111222233331111", false),

    // randomly searched boards
    case("7 4efe722284g2a ", Move::Left, " 74efe72 384 g2a", true),
    case("7 4efe722284g2a ", Move::Right, "74e fe72384 g2a ", true),
    case("c2a7gf7  g2ggdgh", Move::Up, " 2a  f77cg2ghdgh", true),
    case("2fge5815d 6e 9gc", Move::Down, "2fge5815d96e  gc", true),
    case("b2 9h6e57gg1f3b ", Move::Left, " b29h6e5 7h1 f3b", true),
    case("d257b6bh5fc299 d", Move::Right, "d257b6bh5fc2ad  ", true),
    case("h9b6dg6d133c39f9", Move::Right, "h9b6dg6d14c 39f9", true),
    case("chdg3 1a8f 49f29", Move::Down, "chdg3g1a8 249  9", true),
    case(" g2 21d7b3af87g2", Move::Left, "  g221d7b3af87g2", true),
    case("49g79hfgfd 6b f9", Move::Down, "49g79hggfd 6b  9", true),
    case("6 16e4 bgg2hgag ", Move::Left, " 616 e4b h2h gag", true),
    case("6 16e4 bgg2hgag ", Move::Right, "616 e4b h2h gag ", true),
    case("fb d629f435fcc6d", Move::Up, "fb  629d435gcc6d", true),
    case("8 2c aa3bf 374h7", Move::Left, " 82c  b3 bf374h7", true),
    case("8 2c aa3bf 374h7", Move::Right, "82c b3  bf3 74h7", true),
    case("94f25cd21dcbach ", Move::Up, "94f 5cd 1dc3achb", true),
    case("94f25cd21dcbach ", Move::Down, "94f35cdb1dc ach ", true),
    case("bbb1g38defahb4b4", Move::Left, " bc1g38defahb4b4", true),
    case("bbb1g38defahb4b4", Move::Right, "cb1 g38defahb4b4", true),
    case("gg g 997c eae9g5", Move::Left, "  gh  a7 ceae9g5", true),
    case("gg g 997c eae9g5", Move::Right, "hg  a7  cea e9g5", true),
    case("  7e96f78e1d b31", Move::Left, "  7e96f78e1d b31", false),
    case("  7e96f78e1d b31", Move::Right, "7e  96f78e1db31 ", true),
    case("7 98efg65 f5668 ", Move::Up, "7 9 e g85ff66685", true),
    case(" 2 2g4h23e7 e c1", Move::Left, "   3g4h2 3e7 ec1", true),
    case("7198b4dbgecc   e", Move::Left, "7198b4db ged   e", true),
    case("7198b4dbgecc   e", Move::Right, "7198b4dbged e   ", true),
    case("6bb 6 dd d73 369", Move::Up, "  b  bdd d737369", true),
    case("6bb 6 dd d73 369", Move::Down, "7bbd dd3 379  6 ", true),

    // pair split by a different tile
    case("1121            ", Move::Left, " 221            ", true),
    case("1121            ", Move::Right, "221             ", true),
    case("1211            ", Move::Left, " 122            ", true),
    case("1211            ", Move::Right, "122             ", true),

    // top rank never merges
    case("hh              ", Move::Left, "  hh            ", true),
    case("  hh            ", Move::Left, "  hh            ", false),
];
