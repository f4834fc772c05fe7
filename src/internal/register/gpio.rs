//! GPIO Matrix and IO_MUX register definitions
//!
//! The SMI signals have no fixed pads on the ESP32 and are routed through the
//! GPIO Matrix. The RMII reference clock uses dedicated IO_MUX functions.
//!
//! | Signal | Index | Direction |
//! |--------|-------|-----------|
//! | EMAC_MDC_O | 200 | Output |
//! | EMAC_MDI_I | 201 | Input |
//! | EMAC_MDO_O | 201 | Output |

use super::Reg;

// =============================================================================
// GPIO Base Addresses
// =============================================================================

/// GPIO peripheral base address
pub const GPIO_BASE: usize = 0x3FF4_4000;

/// Output set, pins 0..=31
pub const GPIO_OUT_W1TS_OFFSET: usize = 0x08;
/// Output clear, pins 0..=31
pub const GPIO_OUT_W1TC_OFFSET: usize = 0x0C;
/// Output set, pins 32..=39
pub const GPIO_OUT1_W1TS_OFFSET: usize = 0x14;
/// Output clear, pins 32..=39
pub const GPIO_OUT1_W1TC_OFFSET: usize = 0x18;
/// Output enable set, pins 0..=31
pub const GPIO_ENABLE_W1TS_OFFSET: usize = 0x24;
/// Output enable clear, pins 0..=31
pub const GPIO_ENABLE_W1TC_OFFSET: usize = 0x28;
/// Output enable set, pins 32..=39
pub const GPIO_ENABLE1_W1TS_OFFSET: usize = 0x30;
/// Output enable clear, pins 32..=39
pub const GPIO_ENABLE1_W1TC_OFFSET: usize = 0x34;

/// For signal S: GPIO_BASE + 0x130 + S * 4
pub const GPIO_FUNC_IN_SEL_CFG_BASE: usize = 0x130;
/// For GPIO N: GPIO_BASE + 0x530 + N * 4
pub const GPIO_FUNC_OUT_SEL_CFG_BASE: usize = 0x530;

/// EMAC MDC output signal index
pub const EMAC_MDC_O_IDX: u32 = 200;
/// EMAC MDIO input signal index
pub const EMAC_MDI_I_IDX: u32 = 201;
/// EMAC MDIO output signal index
pub const EMAC_MDO_O_IDX: u32 = 201;
/// Output signal index meaning "plain GPIO output register"
pub const SIG_GPIO_OUT_IDX: u32 = 256;

/// Function output select field (bits 8:0)
pub const GPIO_FUNC_OUT_SEL_MASK: u32 = 0x1FF;
/// Peripheral controls output enable (bit 10)
pub const GPIO_OEN_SEL: u32 = 1 << 10;
/// Function input select field (bits 5:0)
pub const GPIO_FUNC_IN_SEL_MASK: u32 = 0x3F;
/// Route input through the GPIO Matrix (bit 7)
pub const GPIO_SIG_IN_SEL: u32 = 1 << 7;

// =============================================================================
// IO_MUX
// =============================================================================

/// IO_MUX base address
pub const IO_MUX_BASE: usize = 0x3FF4_9000;
/// PIN_CTRL register (CLK_OUTx selectors)
pub const IO_MUX_PIN_CTRL_OFFSET: usize = 0x00;
/// CLK_OUT1 selector field (bits 3:0)
pub const PIN_CTRL_CLK_OUT1_MASK: u32 = 0xF;
/// CLK_OUT1 source routed to GPIO0 for the EMAC reference clock
pub const PIN_CTRL_CLK_OUT1_EMAC: u32 = 6;

/// Pull-down enable (bit 7)
pub const IO_MUX_FUN_WPD: u32 = 1 << 7;
/// Pull-up enable (bit 8)
pub const IO_MUX_FUN_WPU: u32 = 1 << 8;
/// Input enable (bit 9)
pub const IO_MUX_FUN_IE: u32 = 1 << 9;
/// Drive strength field (bits 11:10)
pub const IO_MUX_FUN_DRV_MASK: u32 = 0x3 << 10;
/// Function select shift (bits 14:12)
pub const IO_MUX_MCU_SEL_SHIFT: u32 = 12;
/// Function select mask
pub const IO_MUX_MCU_SEL_MASK: u32 = 0x7 << 12;

/// IO_MUX function: GPIO Matrix
pub const IO_MUX_FUNC_GPIO: u32 = 2;
/// IO_MUX function on GPIO0: CLK_OUT1
pub const IO_MUX_GPIO0_FUNC_CLK_OUT1: u32 = 1;
/// IO_MUX function on GPIO0: EMAC_TX_CLK (reference clock input)
pub const IO_MUX_GPIO0_FUNC_EMAC_TX_CLK: u32 = 5;
/// IO_MUX function on GPIO16/17: EMAC_CLK_OUT / EMAC_CLK_180
pub const IO_MUX_FUNC_EMAC_CLK_OUT: u32 = 5;

/// Highest GPIO number on the ESP32
pub const MAX_GPIO: u8 = 39;
/// First input-only GPIO
pub const FIRST_INPUT_ONLY_GPIO: u8 = 34;

/// IO_MUX register offset for a GPIO, if the pad exists.
pub const fn iomux_offset(gpio_num: u8) -> Option<usize> {
    let offset = match gpio_num {
        0 => 0x44,
        1 => 0x88,
        2 => 0x40,
        3 => 0x84,
        4 => 0x48,
        5 => 0x6C,
        6 => 0x60,
        7 => 0x64,
        8 => 0x68,
        9 => 0x54,
        10 => 0x58,
        11 => 0x5C,
        12 => 0x34,
        13 => 0x38,
        14 => 0x30,
        15 => 0x3C,
        16 => 0x4C,
        17 => 0x50,
        18 => 0x70,
        19 => 0x74,
        20 => 0x78,
        21 => 0x7C,
        22 => 0x80,
        23 => 0x8C,
        25 => 0x24,
        26 => 0x28,
        27 => 0x2C,
        32 => 0x1C,
        33 => 0x20,
        34 => 0x14,
        35 => 0x18,
        36 => 0x04,
        37 => 0x08,
        38 => 0x0C,
        39 => 0x10,
        _ => return None,
    };
    Some(offset)
}

/// Output-enable and output-level register set for one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinBank {
    /// Output enable set register address
    pub enable_w1ts: usize,
    /// Output enable clear register address
    pub enable_w1tc: usize,
    /// Output set register address
    pub out_w1ts: usize,
    /// Output clear register address
    pub out_w1tc: usize,
    /// Pin bit within the bank
    pub mask: u32,
}

impl PinBank {
    /// Registers for `gpio_num`. Pins 32 and up live in the second bank.
    pub const fn for_pin(gpio_num: u8) -> Self {
        if gpio_num < 32 {
            Self {
                enable_w1ts: GPIO_BASE + GPIO_ENABLE_W1TS_OFFSET,
                enable_w1tc: GPIO_BASE + GPIO_ENABLE_W1TC_OFFSET,
                out_w1ts: GPIO_BASE + GPIO_OUT_W1TS_OFFSET,
                out_w1tc: GPIO_BASE + GPIO_OUT_W1TC_OFFSET,
                mask: 1 << gpio_num,
            }
        } else {
            Self {
                enable_w1ts: GPIO_BASE + GPIO_ENABLE1_W1TS_OFFSET,
                enable_w1tc: GPIO_BASE + GPIO_ENABLE1_W1TC_OFFSET,
                out_w1ts: GPIO_BASE + GPIO_OUT1_W1TS_OFFSET,
                out_w1tc: GPIO_BASE + GPIO_OUT1_W1TC_OFFSET,
                mask: 1 << (gpio_num - 32),
            }
        }
    }
}

const fn out_sel_addr(gpio_num: u8) -> usize {
    GPIO_BASE + GPIO_FUNC_OUT_SEL_CFG_BASE + (gpio_num as usize * 4)
}

const fn in_sel_addr(signal: u32) -> usize {
    GPIO_BASE + GPIO_FUNC_IN_SEL_CFG_BASE + (signal as usize * 4)
}

/// Register at an address computed in this module.
fn reg(addr: usize) -> Reg {
    // SAFETY: every address here is a GPIO or IO_MUX register derived from
    // GPIO_BASE or IO_MUX_BASE for a pin or signal that exists
    unsafe { Reg::new(addr) }
}

// =============================================================================
// GPIO Matrix Configuration Functions
// =============================================================================

/// GPIO Matrix and IO_MUX pin routing
///
/// Callers validate pin numbers; every function here is a no-op for pads
/// that do not exist.
pub struct GpioMatrix;

impl GpioMatrix {
    /// Route EMAC_MDC_O to `gpio_num`.
    pub fn configure_mdc(gpio_num: u8) {
        Self::select_function(gpio_num, IO_MUX_FUNC_GPIO, false);
        let bank = PinBank::for_pin(gpio_num);
        reg(bank.enable_w1ts).write(bank.mask);
        reg(out_sel_addr(gpio_num)).write((EMAC_MDC_O_IDX & GPIO_FUNC_OUT_SEL_MASK) | GPIO_OEN_SEL);
        trace!("GPIO{} routed as MDC", gpio_num);
    }

    /// Route EMAC_MDO_O / EMAC_MDI_I to `gpio_num`.
    pub fn configure_mdio(gpio_num: u8) {
        Self::select_function(gpio_num, IO_MUX_FUNC_GPIO, true);
        let bank = PinBank::for_pin(gpio_num);
        reg(bank.enable_w1ts).write(bank.mask);
        reg(out_sel_addr(gpio_num)).write((EMAC_MDO_O_IDX & GPIO_FUNC_OUT_SEL_MASK) | GPIO_OEN_SEL);
        reg(in_sel_addr(EMAC_MDI_I_IDX)).write((gpio_num as u32 & GPIO_FUNC_IN_SEL_MASK) | GPIO_SIG_IN_SEL);
        trace!("GPIO{} routed as MDIO", gpio_num);
    }

    /// Detach a pin from any peripheral signal and float it as an input.
    pub fn release(gpio_num: u8) {
        if iomux_offset(gpio_num).is_none() {
            return;
        }
        let bank = PinBank::for_pin(gpio_num);
        reg(out_sel_addr(gpio_num)).write(SIG_GPIO_OUT_IDX);
        reg(bank.enable_w1tc).write(bank.mask);
        Self::select_function(gpio_num, IO_MUX_FUNC_GPIO, true);
    }

    /// Drive a pin as a plain GPIO output.
    pub fn set_output(gpio_num: u8, high: bool) {
        if iomux_offset(gpio_num).is_none() || gpio_num >= FIRST_INPUT_ONLY_GPIO {
            return;
        }
        Self::select_function(gpio_num, IO_MUX_FUNC_GPIO, false);
        let bank = PinBank::for_pin(gpio_num);
        reg(out_sel_addr(gpio_num)).write(SIG_GPIO_OUT_IDX);
        reg(if high { bank.out_w1ts } else { bank.out_w1tc }).write(bank.mask);
        reg(bank.enable_w1ts).write(bank.mask);
    }

    /// Make a pin a plain GPIO input with the weak pull-up enabled.
    pub fn set_input_pullup(gpio_num: u8) {
        let Some(offset) = iomux_offset(gpio_num) else {
            return;
        };
        let bank = PinBank::for_pin(gpio_num);
        reg(bank.enable_w1tc).write(bank.mask);
        reg(IO_MUX_BASE + offset).modify(|v| {
            ((v & !(IO_MUX_MCU_SEL_MASK | IO_MUX_FUN_WPD))
                | (IO_MUX_FUNC_GPIO << IO_MUX_MCU_SEL_SHIFT))
                | IO_MUX_FUN_WPU
                | IO_MUX_FUN_IE
        });
    }

    /// Feed the external reference clock on GPIO0 into the EMAC.
    pub fn route_clock_input_gpio0() {
        Self::select_function(0, IO_MUX_GPIO0_FUNC_EMAC_TX_CLK, true);
    }

    /// Drive the internal reference clock out of GPIO0 via CLK_OUT1.
    pub fn route_clock_output_gpio0() {
        reg(IO_MUX_BASE + IO_MUX_PIN_CTRL_OFFSET).modify(|v| (v & !PIN_CTRL_CLK_OUT1_MASK) | PIN_CTRL_CLK_OUT1_EMAC);
        Self::select_peripheral_output(0, IO_MUX_GPIO0_FUNC_CLK_OUT1);
    }

    /// Drive the internal reference clock out of GPIO16 or GPIO17.
    pub fn route_clock_output(gpio_num: u8) {
        Self::select_peripheral_output(gpio_num, IO_MUX_FUNC_EMAC_CLK_OUT);
    }

    fn select_function(gpio_num: u8, func: u32, input: bool) {
        let Some(offset) = iomux_offset(gpio_num) else {
            return;
        };
        reg(IO_MUX_BASE + offset).modify(|v| {
            let v = (v & !IO_MUX_MCU_SEL_MASK) | (func << IO_MUX_MCU_SEL_SHIFT);
            if input { v | IO_MUX_FUN_IE } else { v & !IO_MUX_FUN_IE }
        });
    }

    fn select_peripheral_output(gpio_num: u8, func: u32) {
        let Some(offset) = iomux_offset(gpio_num) else {
            return;
        };
        reg(IO_MUX_BASE + offset).modify(|v| {
            (v & !(IO_MUX_MCU_SEL_MASK
                | IO_MUX_FUN_WPU
                | IO_MUX_FUN_WPD
                | IO_MUX_FUN_IE
                | IO_MUX_FUN_DRV_MASK))
                | (func << IO_MUX_MCU_SEL_SHIFT)
                | IO_MUX_FUN_DRV_MASK
        });
        reg(out_sel_addr(gpio_num)).write(SIG_GPIO_OUT_IDX);
        trace!(
            "GPIO{} IO_MUX function {}: {:#010x}",
            gpio_num,
            func,
            reg(IO_MUX_BASE + offset).read()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_routing_addresses() {
        assert_eq!(out_sel_addr(23), 0x3FF4_458C);
        assert_eq!(in_sel_addr(EMAC_MDI_I_IDX), 0x3FF4_4454);
    }

    #[test]
    fn iomux_addresses() {
        assert_eq!(iomux_offset(18), Some(0x70));
        assert_eq!(iomux_offset(23), Some(0x8C));
        assert_eq!(iomux_offset(32), Some(0x1C));
        assert_eq!(iomux_offset(24), None);
        assert_eq!(iomux_offset(40), None);
    }

    #[test]
    fn high_pins_use_second_bank() {
        let low = PinBank::for_pin(23);
        assert_eq!(low.mask, 1 << 23);
        assert_eq!(low.enable_w1ts, GPIO_BASE + 0x24);
        assert_eq!(low.out_w1tc, GPIO_BASE + 0x0C);

        let high = PinBank::for_pin(33);
        assert_eq!(high.mask, 1 << 1);
        assert_eq!(high.enable_w1ts, GPIO_BASE + 0x30);
        assert_eq!(high.enable_w1tc, GPIO_BASE + 0x34);
        assert_eq!(high.out_w1ts, GPIO_BASE + 0x14);
        assert_eq!(high.out_w1tc, GPIO_BASE + 0x18);
    }
}
